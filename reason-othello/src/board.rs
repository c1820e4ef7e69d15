//! An Othello board seen from the perspective of the player to move.

use crate::bitboard::{self, Bitboard};
use crate::{utils, Location, LocationList, NUM_SPACES};
use derive_more::{Display, Error};
use std::fmt;

/// A pair of bitboards storing the complete game state, relative to the active player.
///
/// Operations on a [`Board`] are unchecked: [`Board::apply_move`] trusts that the
/// location is legal. Use [`crate::Position`] for checked resolution.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Board {
    pub active_bitboard: Bitboard,
    pub opponent_bitboard: Bitboard,
    /// Whether the previous player passed to reach this board.
    pub just_passed: bool,
}

impl Default for Board {
    /// Gets the starting board from Black's perspective.
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The starting board, with Black to move.
    pub const fn new() -> Self {
        Self {
            active_bitboard: bitboard::BLACK_START,
            opponent_bitboard: bitboard::WHITE_START,
            just_passed: false,
        }
    }

    /// Build a board from the active player's and the opponent's pieces.
    pub const fn from_bitboards(active_bitboard: Bitboard, opponent_bitboard: Bitboard) -> Self {
        Self {
            active_bitboard,
            opponent_bitboard,
            just_passed: false,
        }
    }

    /// Get the list of legal moves for the active player.
    #[inline]
    pub fn get_moves(self) -> LocationList {
        bitboard::get_move_mask(self.active_bitboard, self.opponent_bitboard).into()
    }

    /// Make a pass move for the active player.
    #[inline]
    pub fn pass(self) -> Self {
        Self {
            active_bitboard: self.opponent_bitboard,
            opponent_bitboard: self.active_bitboard,
            just_passed: true,
        }
    }

    /// Make a placement move for the active player. The result is from the opponent's perspective.
    /// Inconsistent if `loc` is not a legal move.
    #[inline]
    pub fn apply_move(self, loc: Location) -> Self {
        let (new_active, new_opponent) =
            bitboard::apply_move(self.active_bitboard, self.opponent_bitboard, loc.into());

        Self {
            active_bitboard: new_opponent,
            opponent_bitboard: new_active,
            just_passed: false,
        }
    }

    /// Whether neither player can move.
    pub fn is_finished(self) -> bool {
        self.get_moves().is_empty() && self.pass().get_moves().is_empty()
    }

    /// Score a board as: # my pieces - # opponent pieces.
    #[inline]
    pub fn score_absolute_difference(self) -> i8 {
        bitboard::score_absolute_difference(self.active_bitboard, self.opponent_bitboard)
    }

    /// Get a mask indicating where the occupied spaces are.
    #[inline]
    pub fn occupied_mask(self) -> Bitboard {
        self.active_bitboard | self.opponent_bitboard
    }

    /// Count the empty spaces on the board.
    #[inline]
    pub fn count_empties(self) -> u8 {
        self.occupied_mask().count_empty()
    }
}

/// Render the active player's pieces as `#` and the opponent's as `O`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pieces = self
            .active_bitboard
            .into_iter()
            .zip(self.opponent_bitboard.into_iter())
            .map(|pair| match pair {
                (false, false) => '.',
                (true, false) => '#',
                (false, true) => 'O',
                (true, true) => '!',
            });

        utils::format_grid(pieces, f)?;
        if self.just_passed {
            f.write_str("\n(Last move was a pass)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Display, Error, PartialEq)]
pub enum ParseBoardError {
    #[display(fmt = "expected {} squares, found {}", NUM_SPACES, found)]
    WrongLength { found: usize },
    #[display(fmt = "invalid square character '{}'", found)]
    InvalidCharacter { found: char },
}

/// Parse a board from 64 squares in row-major order, ignoring whitespace:
/// `X` for the active player, `O` for the opponent, and `-` or `.` for empty.
impl std::str::FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut active: u64 = 0;
        let mut opponent: u64 = 0;
        let mut count = 0;

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if count >= NUM_SPACES {
                count += 1;
                continue;
            }

            let bit = 1u64 << (NUM_SPACES - 1 - count);
            match c {
                'X' | 'x' => active |= bit,
                'O' | 'o' => opponent |= bit,
                '-' | '.' => {}
                other => return Err(ParseBoardError::InvalidCharacter { found: other }),
            }
            count += 1;
        }

        if count != NUM_SPACES {
            return Err(ParseBoardError::WrongLength { found: count });
        }

        Ok(Self::from_bitboards(active.into(), opponent.into()))
    }
}
