//! Implements game-level Othello logic: player colors, moves, and color-indexed positions.
//!
//! For correctness, this higher-level interface is preferred, but for
//! performance you may use [`Board`] for raw player-relative access.

use crate::bitboard::{self, Bitboard};
use crate::{utils, Board, Location, LocationList, ParseLocationError};
use derive_more::{Display, Error};
use std::fmt;
use std::str::FromStr;

/// One of the two players in a game.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Display)]
pub enum Player {
    Black,
    White,
}

impl Default for Player {
    /// Gets the starting player (black).
    fn default() -> Self {
        Self::Black
    }
}

impl Player {
    /// Gets the other player.
    #[inline]
    pub fn opponent(self) -> Self {
        !self
    }
}

impl std::ops::Not for Player {
    type Output = Self;

    /// Gets the other player.
    fn not(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

#[derive(Debug, Display, Error, PartialEq)]
#[display(fmt = "invalid player string: expected \"Black\" or \"White\"")]
pub struct ParsePlayerError;

/// Parse a player from its name, as given on a referee's command line ("Black" / "White").
impl FromStr for Player {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" => Ok(Self::Black),
            "white" | "w" => Ok(Self::White),
            _ => Err(ParsePlayerError),
        }
    }
}

/// An action in an Othello game: pass or place a piece at a location.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Move {
    Piece(Location),
    Pass,
}

impl Move {
    #[inline]
    pub fn is_pass(self) -> bool {
        self == Move::Pass
    }
}

impl From<Location> for Move {
    fn from(loc: Location) -> Self {
        Self::Piece(loc)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Piece(loc) => fmt::Display::fmt(loc, f),
            Move::Pass => f.write_str("PASS"),
        }
    }
}

#[derive(Debug, Display, Error, PartialEq)]
#[display(fmt = "invalid move string")]
pub struct ParseMoveError;

impl From<ParseLocationError> for ParseMoveError {
    fn from(_: ParseLocationError) -> Self {
        ParseMoveError
    }
}

/// Build a [`Move`] from string notation ("A4" / "PASS").
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pass") {
            return Ok(Move::Pass);
        }

        Ok(Move::Piece(s.parse()?))
    }
}

/// A placement that the rules do not allow.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq)]
#[display(fmt = "illegal move {} for {}", location, player)]
pub struct IllegalMoveError {
    pub player: Player,
    pub location: Location,
}

/// A color-indexed snapshot of the board.
///
/// Unlike [`Board`], a [`Position`] does not track whose turn it is: the caller names
/// the color making each move, and moves are checked for legality.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Position {
    pub black: Bitboard,
    pub white: Bitboard,
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl Position {
    /// The standard starting position.
    pub const fn starting() -> Self {
        Self {
            black: bitboard::BLACK_START,
            white: bitboard::WHITE_START,
        }
    }

    /// Build a position from a player-relative board, where `player` owns the active pieces.
    pub fn from_player_view(board: Board, player: Player) -> Self {
        match player {
            Player::Black => Self {
                black: board.active_bitboard,
                white: board.opponent_bitboard,
            },
            Player::White => Self {
                black: board.opponent_bitboard,
                white: board.active_bitboard,
            },
        }
    }

    /// Get the board as seen by `player`: (own pieces, opponent pieces).
    pub fn player_view(self, player: Player) -> Board {
        match player {
            Player::Black => Board::from_bitboards(self.black, self.white),
            Player::White => Board::from_bitboards(self.white, self.black),
        }
    }

    /// Get one player's pieces.
    #[inline]
    pub fn pieces(self, player: Player) -> Bitboard {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    /// Count one player's pieces.
    #[inline]
    pub fn piece_count(self, player: Player) -> u8 {
        self.pieces(player).count_occupied()
    }

    /// Count the empty squares.
    #[inline]
    pub fn count_empties(self) -> u8 {
        (self.black | self.white).count_empty()
    }

    /// Get the legal placements for `player`.
    #[inline]
    pub fn legal_moves(self, player: Player) -> LocationList {
        self.player_view(player).get_moves()
    }

    /// Whether `player` has any legal placement.
    #[inline]
    pub fn has_moves(self, player: Player) -> bool {
        !self.legal_moves(player).is_empty()
    }

    /// Place a piece for `player` at `location`, flipping captured pieces.
    /// Fails without changing anything if the placement is not legal.
    pub fn resolve_move(self, player: Player, location: Location) -> Result<Self, IllegalMoveError> {
        if !self.legal_moves(player).contains(location) {
            return Err(IllegalMoveError { player, location });
        }

        let board = self.player_view(player);
        let (active, opponent) =
            bitboard::apply_move(board.active_bitboard, board.opponent_bitboard, location.into());

        Ok(Self::from_player_view(
            Board::from_bitboards(active, opponent),
            player,
        ))
    }

    /// Whether neither player can move.
    pub fn is_finished(self) -> bool {
        !self.has_moves(Player::Black) && !self.has_moves(Player::White)
    }

    /// The player with more pieces, or None for a draw.
    /// Meaningful once the game is finished.
    pub fn winner(self) -> Option<Player> {
        let black = self.piece_count(Player::Black);
        let white = self.piece_count(Player::White);

        if black > white {
            Some(Player::Black)
        } else if white > black {
            Some(Player::White)
        } else {
            None
        }
    }
}

/// Render Black as `X` and White as `O`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pieces = self
            .black
            .into_iter()
            .zip(self.white.into_iter())
            .map(|pair| match pair {
                (false, false) => '.',
                (true, false) => 'X',
                (false, true) => 'O',
                (true, true) => '!',
            });

        utils::format_grid(pieces, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::IteratorRandom;
    use rand::SeedableRng;

    fn loc(s: &str) -> Location {
        s.parse().unwrap()
    }

    #[test]
    fn player_opponent() {
        assert_eq!(Player::Black.opponent(), Player::White);
        assert_eq!(Player::White.opponent(), Player::Black);
        assert_eq!(!!Player::Black, Player::Black);
    }

    #[test]
    fn parse_player() {
        assert_eq!("Black".parse(), Ok(Player::Black));
        assert_eq!("white".parse(), Ok(Player::White));
        assert_eq!("Red".parse::<Player>(), Err(ParsePlayerError));
    }

    #[test]
    fn parse_move() {
        assert_eq!("pass".parse(), Ok(Move::Pass));
        assert_eq!("PASS".parse(), Ok(Move::Pass));
        assert_eq!("c4".parse(), Ok(Move::Piece(loc("C4"))));
        assert_eq!("Z9".parse::<Move>(), Err(ParseMoveError));
        assert_eq!(Move::Piece(loc("C4")).to_string(), "C4");
        assert_eq!(Move::Pass.to_string(), "PASS");
    }

    #[test]
    fn starting_position() {
        let position = Position::starting();
        assert_eq!(position.piece_count(Player::Black), 2);
        assert_eq!(position.piece_count(Player::White), 2);
        assert_eq!(position.count_empties(), 60);
        assert_eq!(position.legal_moves(Player::Black).len(), 4);
        assert_eq!(position.legal_moves(Player::White).len(), 4);
    }

    #[test]
    fn resolve_legal_move() {
        let position = Position::starting()
            .resolve_move(Player::Black, loc("D3"))
            .unwrap();

        assert_eq!(position.piece_count(Player::Black), 4);
        assert_eq!(position.piece_count(Player::White), 1);
        assert_eq!(position.count_empties(), 59);
    }

    #[test]
    fn resolve_illegal_move() {
        let position = Position::starting();
        assert_eq!(
            position.resolve_move(Player::Black, loc("A1")),
            Err(IllegalMoveError {
                player: Player::Black,
                location: loc("A1")
            })
        );

        // Occupied squares are never legal.
        assert!(position.resolve_move(Player::Black, loc("D4")).is_err());
    }

    #[test]
    fn player_view_round_trip() {
        let position = Position::starting()
            .resolve_move(Player::Black, loc("F5"))
            .unwrap();

        let white_view = position.player_view(Player::White);
        assert_eq!(white_view.active_bitboard, position.white);
        assert_eq!(white_view.opponent_bitboard, position.black);
        assert_eq!(Position::from_player_view(white_view, Player::White), position);
    }

    #[test]
    fn resolution_matches_board_dynamics() {
        // Composing checked resolutions agrees with the player-relative board on random games.
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let mut position = Position::starting();
            let mut board = Board::new();
            let mut player = Player::Black;

            while !position.is_finished() {
                match position.legal_moves(player).choose(&mut rng) {
                    Some(location) => {
                        position = position.resolve_move(player, location).unwrap();
                        board = board.apply_move(location);
                    }
                    None => board = board.pass(),
                }
                player = !player;

                assert_eq!(Position::from_player_view(board, player), position);
                assert_eq!(
                    position.piece_count(Player::Black) + position.piece_count(Player::White),
                    64 - position.count_empties()
                );
            }

            assert!(board.is_finished());
        }
    }

    #[test]
    fn winner() {
        assert_eq!(Position::starting().winner(), None);
        let position = Position {
            black: Bitboard::from(0b111),
            white: Bitboard::from(0b1000),
        };
        assert_eq!(position.winner(), Some(Player::Black));
    }
}
