//! `reason-player` plays Othello against an external referee under a real clock.
//!
//! A [`Strategy`] chooses moves; a [`StrategyConfig`] builds one once the color and time
//! budget are known. [`endgame::WithSolver`] wraps any config so the exact solver takes
//! over late in the game. [`match_loop::run_match`] plays a match over a
//! [`connectors::Connector`], such as the CS2 line protocol on stdin/stdout.

pub mod arena;
pub mod connectors;
pub mod endgame;
pub mod match_loop;
pub mod mcts;
pub mod players;
pub mod strategy;

pub use endgame::{SolverHandoff, WithSolver};
pub use match_loop::{run_match, Match, MatchError};
pub use strategy::{Millis, Strategy, StrategyConfig};
