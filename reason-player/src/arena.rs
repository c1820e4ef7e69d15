//! Runs local games between two strategies, acting as the referee.
//!
//! Each player gets its own clock, charged with the wall-clock time of each of its moves.
//! Running out of time loses the game. Unlike [`crate::match_loop`], the arena checks
//! passes as well as placements: passing while a placement is available is an error.

use crate::strategy::{Millis, Strategy, StrategyConfig};
use derive_more::{Display, Error};
use reason_othello::{IllegalMoveError, Move, Player, Position};
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info};

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Win(player) => write!(f, "{} wins", player),
            GameOutcome::Draw => f.write_str("Draw"),
        }
    }
}

/// The record of a finished game.
#[derive(Clone, Debug)]
pub struct GameResult {
    pub outcome: GameOutcome,
    /// The player whose clock ran out, if any.
    pub timed_out: Option<Player>,
    /// The position when the game stopped.
    pub position: Position,
    /// Every move played, starting with Black's.
    pub moves: Vec<Move>,
}

/// A player broke the rules. The game can't be scored.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq)]
pub enum ArenaError {
    #[display(fmt = "cannot play: {}", _0)]
    IllegalMove(IllegalMoveError),
    #[display(fmt = "{} passed with a legal move available", player)]
    IllegalPass { player: Player },
}

impl From<IllegalMoveError> for ArenaError {
    fn from(err: IllegalMoveError) -> Self {
        ArenaError::IllegalMove(err)
    }
}

/// Per-player state for one game.
struct Contestant<S> {
    strategy: S,
    ms_left: Option<Millis>,
}

impl<S: Strategy> Contestant<S> {
    /// Ask for a move and charge the time it took.
    fn take_turn(&mut self, position: Position, last_move: Move) -> Move {
        let start = Instant::now();
        let mv = self.strategy.choose_move(position, last_move, self.ms_left);
        let elapsed_ms = start.elapsed().as_millis() as Millis;

        if let Some(ms_left) = self.ms_left.as_mut() {
            *ms_left -= elapsed_ms;
        }
        mv
    }

    fn timed_out(&self) -> bool {
        self.ms_left.map_or(false, |ms_left| ms_left < 0)
    }
}

/// Play a complete game from the starting position, giving each player
/// `max_time` milliseconds (None for unlimited).
pub fn play_game<B, W>(black: &B, white: &W, max_time: Option<Millis>) -> Result<GameResult, ArenaError>
where
    B: StrategyConfig,
    W: StrategyConfig,
{
    info!(black = %black.name(), white = %white.name(), ?max_time, "Starting game");

    let mut black = Contestant {
        strategy: black.build(Player::Black, max_time),
        ms_left: max_time,
    };
    let mut white = Contestant {
        strategy: white.build(Player::White, max_time),
        ms_left: max_time,
    };

    let mut position = Position::starting();
    let mut current = Player::Black;
    let mut last_move = Move::Pass;
    let mut just_passed = false;
    let mut moves = Vec::new();

    loop {
        let (mv, timed_out) = match current {
            Player::Black => (black.take_turn(position, last_move), black.timed_out()),
            Player::White => (white.take_turn(position, last_move), white.timed_out()),
        };

        if timed_out {
            error!(player = %current, "Player timed out");
            return Ok(GameResult {
                outcome: GameOutcome::Win(!current),
                timed_out: Some(current),
                position,
                moves,
            });
        }

        moves.push(mv);
        match mv {
            Move::Pass => {
                if position.has_moves(current) {
                    return Err(ArenaError::IllegalPass { player: current });
                }
                if just_passed {
                    break;
                }
                just_passed = true;
            }
            Move::Piece(loc) => {
                position = position.resolve_move(current, loc)?;
                just_passed = false;
            }
        }

        debug!(player = %current, %mv, "Move played");
        last_move = mv;
        current = !current;
    }

    let outcome = position
        .winner()
        .map_or(GameOutcome::Draw, GameOutcome::Win);
    info!(
        %outcome,
        black = position.piece_count(Player::Black),
        white = position.piece_count(Player::White),
        "Game over"
    );

    Ok(GameResult {
        outcome,
        timed_out: None,
        position,
        moves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::RandomConfig;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn random_game_finishes() {
        let result = play_game(&RandomConfig::with_seed(1), &RandomConfig::with_seed(2), None).unwrap();

        assert!(result.position.is_finished());
        assert_eq!(result.timed_out, None);

        // The game ends on the second of two consecutive passes.
        let n = result.moves.len();
        assert_eq!(&result.moves[n - 2..], &[Move::Pass, Move::Pass]);

        let placements = result.moves.iter().filter(|mv| !mv.is_pass()).count();
        assert_eq!(placements, 60 - result.position.count_empties() as usize);
    }

    #[test]
    fn outcome_matches_piece_counts() {
        for seed in 0..10 {
            let result = play_game(
                &RandomConfig::with_seed(seed),
                &RandomConfig::with_seed(seed + 100),
                Some(60_000),
            )
            .unwrap();

            let black = result.position.piece_count(Player::Black);
            let white = result.position.piece_count(Player::White);
            let expected = if black > white {
                GameOutcome::Win(Player::Black)
            } else if white > black {
                GameOutcome::Win(Player::White)
            } else {
                GameOutcome::Draw
            };
            assert_eq!(result.outcome, expected);
        }
    }

    struct Stubborn(Move);

    impl Strategy for Stubborn {
        fn choose_move(&mut self, _: Position, _: Move, _: Option<Millis>) -> Move {
            self.0
        }
    }

    struct StubbornConfig(Move);

    impl StrategyConfig for StubbornConfig {
        type Strategy = Stubborn;

        fn name(&self) -> String {
            "stubborn".to_string()
        }

        fn build(&self, _: Player, _: Option<Millis>) -> Stubborn {
            Stubborn(self.0)
        }
    }

    #[test]
    fn illegal_pass_is_rejected() {
        let result = play_game(&StubbornConfig(Move::Pass), &RandomConfig::with_seed(0), None);
        assert_eq!(
            result.unwrap_err(),
            ArenaError::IllegalPass {
                player: Player::Black
            }
        );
    }

    #[test]
    fn illegal_placement_is_rejected() {
        let a1 = Move::Piece("A1".parse().unwrap());
        let result = play_game(&RandomConfig::with_seed(0), &StubbornConfig(a1), None);
        assert!(matches!(
            result,
            Err(ArenaError::IllegalMove(IllegalMoveError {
                player: Player::White,
                ..
            }))
        ));
    }

    struct Sleepy;

    impl Strategy for Sleepy {
        fn choose_move(&mut self, _: Position, _: Move, _: Option<Millis>) -> Move {
            thread::sleep(Duration::from_millis(20));
            Move::Pass
        }
    }

    struct SleepyConfig;

    impl StrategyConfig for SleepyConfig {
        type Strategy = Sleepy;

        fn name(&self) -> String {
            "sleepy".to_string()
        }

        fn build(&self, _: Player, _: Option<Millis>) -> Sleepy {
            Sleepy
        }
    }

    #[test]
    fn timeout_loses() {
        let result = play_game(&SleepyConfig, &RandomConfig::with_seed(0), Some(5)).unwrap();
        assert_eq!(result.timed_out, Some(Player::Black));
        assert_eq!(result.outcome, GameOutcome::Win(Player::White));
        assert!(result.moves.is_empty());
    }
}
