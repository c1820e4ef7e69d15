//! Plays one match against an external referee.
//!
//! [`Match`] owns the current [`Position`] and the strategy, and turns each [`RefereeTurn`]
//! into our reply. The strategy can't be built up front: our total time is only known once
//! the first referee line arrives. [`run_match`] wires a [`Match`] to a [`Connector`] and
//! plays until the referee hangs up.

use crate::connectors::{Connector, ProtocolError, RefereeTurn};
use crate::strategy::{Millis, Strategy, StrategyConfig};
use derive_more::{Display, Error};
use itertools::Itertools;
use reason_othello::{IllegalMoveError, Move, Player, Position};
use std::io;
use std::time::Instant;
use tracing::{debug, info, trace};

#[derive(Debug, Display, Error)]
pub enum MatchError {
    #[display(fmt = "protocol error: {}", _0)]
    Protocol(ProtocolError),
    #[display(fmt = "cannot play: {}", _0)]
    IllegalMove(IllegalMoveError),
    #[display(fmt = "failed to write to the referee: {}", _0)]
    Io(io::Error),
}

impl From<ProtocolError> for MatchError {
    fn from(err: ProtocolError) -> Self {
        MatchError::Protocol(err)
    }
}

impl From<IllegalMoveError> for MatchError {
    fn from(err: IllegalMoveError) -> Self {
        MatchError::IllegalMove(err)
    }
}

impl From<io::Error> for MatchError {
    fn from(err: io::Error) -> Self {
        MatchError::Io(err)
    }
}

/// A built strategy and the total time it was built with.
struct Seat<S> {
    strategy: S,
    /// Fixed on the first turn: None if the referee gave us unlimited time.
    ms_total: Option<Millis>,
}

/// The state of one match, from our color's side of the board.
pub struct Match<C: StrategyConfig> {
    config: C,
    color: Player,
    position: Position,
    /// Empty until the first turn.
    seat: Option<Seat<C::Strategy>>,
}

impl<C: StrategyConfig> Match<C> {
    pub fn new(config: C, color: Player) -> Self {
        Self {
            config,
            color,
            position: Position::starting(),
            seat: None,
        }
    }

    /// The position after the most recent turn.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn color(&self) -> Player {
        self.color
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// The strategy, once the first turn has built it.
    pub fn strategy(&self) -> Option<&C::Strategy> {
        self.seat.as_ref().map(|seat| &seat.strategy)
    }

    /// Play one turn: apply the opponent's move, ask the strategy for ours, and apply it.
    ///
    /// Fails if either move is illegal. The position is left as it was before the
    /// offending move.
    pub fn play_turn(&mut self, turn: RefereeTurn) -> Result<Move, MatchError> {
        let color = self.color;
        let config = &self.config;

        let seat = self.seat.get_or_insert_with(|| {
            let ms_total = if turn.ms_left > 0 {
                Some(turn.ms_left)
            } else {
                None
            };

            info!(strategy = %config.name(), %color, ?ms_total, "Building strategy");
            Seat {
                strategy: config.build(color, ms_total),
                ms_total,
            }
        });

        // The strategy must see the board after the opponent's move.
        if let Move::Piece(loc) = turn.opponent_move {
            self.position = self.position.resolve_move(!color, loc)?;
        }
        info!(opponent_move = %turn.opponent_move, "Opponent moved");
        trace!("Position before our move:\n{}", self.position);

        let ms_left = seat.ms_total.map(|_| turn.ms_left);
        debug!(
            ?ms_left,
            legal_moves = %self.position.legal_moves(color).join(" "),
            "Choosing a move"
        );

        let start = Instant::now();
        let mv = seat
            .strategy
            .choose_move(self.position, turn.opponent_move, ms_left);
        let elapsed = start.elapsed();

        // Pieces on the board before our placement, less the four we started with, plus one.
        let move_number = 64 - u32::from(self.position.count_empties()) - 3;
        info!(
            "Move {}: {} ({:.3} s)",
            move_number,
            mv,
            elapsed.as_secs_f64()
        );

        if let Move::Piece(loc) = mv {
            self.position = self.position.resolve_move(color, loc)?;
        }

        Ok(mv)
    }
}

/// Play a match over `connector` until the referee closes it, returning the last position.
pub fn run_match<N, C>(connector: &mut N, config: C) -> Result<Position, MatchError>
where
    N: Connector,
    C: StrategyConfig,
{
    let mut game = Match::new(config, connector.get_player_color());
    connector.set_ready(&game.config().name())?;
    info!(color = %game.color(), "Ready");

    while let Some(turn) = connector.next_turn()? {
        let mv = game.play_turn(turn)?;
        connector.make_move(mv)?;
    }

    info!(
        black = game.position().piece_count(Player::Black),
        white = game.position().piece_count(Player::White),
        "Referee closed the connection"
    );
    Ok(game.position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reason_othello::Location;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::str::FromStr;

    fn loc(s: &str) -> Location {
        Location::from_str(s).unwrap()
    }

    fn turn(opponent_move: Move, ms_left: Millis) -> RefereeTurn {
        RefereeTurn {
            opponent_move,
            ms_left,
        }
    }

    #[derive(Debug, Default)]
    struct Log {
        built: Vec<(Player, Option<Millis>)>,
        calls: Vec<(Position, Move, Option<Millis>)>,
    }

    /// Plays `fixed` if set, otherwise the first legal move.
    struct Scripted {
        color: Player,
        fixed: Option<Move>,
        log: Rc<RefCell<Log>>,
    }

    impl Strategy for Scripted {
        fn choose_move(&mut self, position: Position, opponent_move: Move, ms_left: Option<Millis>) -> Move {
            self.log
                .borrow_mut()
                .calls
                .push((position, opponent_move, ms_left));
            self.fixed.unwrap_or_else(|| {
                position
                    .legal_moves(self.color)
                    .next()
                    .map_or(Move::Pass, Move::Piece)
            })
        }
    }

    #[derive(Default)]
    struct ScriptedConfig {
        fixed: Option<Move>,
        log: Rc<RefCell<Log>>,
    }

    impl StrategyConfig for ScriptedConfig {
        type Strategy = Scripted;

        fn name(&self) -> String {
            "scripted".to_string()
        }

        fn build(&self, color: Player, ms_total: Option<Millis>) -> Scripted {
            self.log.borrow_mut().built.push((color, ms_total));
            Scripted {
                color,
                fixed: self.fixed,
                log: Rc::clone(&self.log),
            }
        }
    }

    #[test]
    fn builds_once_with_first_budget() {
        let config = ScriptedConfig::default();
        let log = Rc::clone(&config.log);
        let mut game = Match::new(config, Player::Black);
        assert!(game.strategy().is_none());

        let first = game.play_turn(turn(Move::Pass, 10_000)).unwrap();
        assert!(game.strategy().is_some());

        let reply = game
            .position()
            .legal_moves(Player::White)
            .next()
            .map_or(Move::Pass, Move::Piece);
        game.play_turn(turn(reply, 9_000)).unwrap();

        let log = log.borrow();
        assert_eq!(log.built, vec![(Player::Black, Some(10_000))]);
        assert_eq!(log.calls[0].2, Some(10_000));
        assert_eq!(log.calls[1].2, Some(9_000));
        assert_eq!(log.calls[1].1, reply);
        assert!(first != Move::Pass);
    }

    #[test]
    fn non_positive_first_budget_is_unlimited() {
        for &first_ms in [0, -1].iter() {
            let config = ScriptedConfig::default();
            let log = Rc::clone(&config.log);
            let mut game = Match::new(config, Player::Black);

            game.play_turn(turn(Move::Pass, first_ms)).unwrap();
            let reply = game
                .position()
                .legal_moves(Player::White)
                .next()
                .map_or(Move::Pass, Move::Piece);
            // Later positive values don't make the match timed.
            game.play_turn(turn(reply, 5_000)).unwrap();

            let log = log.borrow();
            assert_eq!(log.built, vec![(Player::Black, None)]);
            assert!(log.calls.iter().all(|call| call.2.is_none()));
        }
    }

    #[test]
    fn opponent_move_resolved_before_strategy() {
        let config = ScriptedConfig::default();
        let log = Rc::clone(&config.log);
        let mut game = Match::new(config, Player::White);

        let d3 = Move::Piece(loc("D3"));
        let reply = game.play_turn(turn(d3, 1_000)).unwrap();

        let after_d3 = Position::starting()
            .resolve_move(Player::Black, loc("D3"))
            .unwrap();
        assert_eq!(log.borrow().calls, vec![(after_d3, d3, Some(1_000))]);

        let expected = match reply {
            Move::Piece(loc) => after_d3.resolve_move(Player::White, loc).unwrap(),
            Move::Pass => panic!("white has moves after D3"),
        };
        assert_eq!(game.position(), expected);
    }

    #[test]
    fn opponent_pass_on_first_turn() {
        let config = ScriptedConfig::default();
        let log = Rc::clone(&config.log);
        let mut game = Match::new(config, Player::White);

        game.play_turn(turn(Move::Pass, 1_000)).unwrap();
        assert_eq!(
            log.borrow().calls,
            vec![(Position::starting(), Move::Pass, Some(1_000))]
        );
    }

    #[test]
    fn our_pass_leaves_position_unchanged() {
        let config = ScriptedConfig {
            fixed: Some(Move::Pass),
            ..ScriptedConfig::default()
        };
        let mut game = Match::new(config, Player::Black);

        assert_eq!(game.play_turn(turn(Move::Pass, 0)).unwrap(), Move::Pass);
        assert_eq!(game.position(), Position::starting());
    }

    #[test]
    fn illegal_opponent_move_is_fatal() {
        let mut game = Match::new(ScriptedConfig::default(), Player::White);
        let err = game
            .play_turn(turn(Move::Piece(loc("A1")), 1_000))
            .unwrap_err();

        assert!(matches!(
            err,
            MatchError::IllegalMove(IllegalMoveError {
                player: Player::Black,
                ..
            })
        ));
        assert_eq!(game.position(), Position::starting());
    }

    #[test]
    fn error_chain_does_not_repeat_itself() {
        use std::error::Error;

        let mut game = Match::new(ScriptedConfig::default(), Player::White);
        let err = game
            .play_turn(turn(Move::Piece(loc("A1")), 1_000))
            .unwrap_err();

        assert_eq!(err.to_string(), "cannot play: illegal move A1 for Black");
        let source = err.source().map(|source| source.to_string());
        assert_eq!(source.as_deref(), Some("illegal move A1 for Black"));
    }

    #[test]
    fn illegal_strategy_move_is_fatal() {
        let config = ScriptedConfig {
            fixed: Some(Move::Piece(loc("H8"))),
            ..ScriptedConfig::default()
        };
        let mut game = Match::new(config, Player::Black);

        assert!(matches!(
            game.play_turn(turn(Move::Pass, 1_000)),
            Err(MatchError::IllegalMove(IllegalMoveError {
                player: Player::Black,
                ..
            }))
        ));
        assert_eq!(game.position(), Position::starting());
    }
}
