//! `reason-othello` is a fast, full-featured Othello library for engines and players.
//!
//! This package implements three levels of abstraction:
//!
//!  - [`bitboard`] contains the raw, unchecked operations for working with Othello boards.
//!    These are fast, but may result in inconsistent state if their contracts are not manually checked.
//!  - [`Board`] implements the core game logic from the perspective of the player to move,
//!    in the same fast, unchecked way as [`bitboard`]. This is suitable for use with engines.
//!  - [`Position`] is a color-indexed snapshot with checked move resolution.
//!    It is slower but safer, and is what a referee or match loop should hold.

pub mod bitboard;
pub mod test_utils;

mod board;
mod game;
mod location;
mod utils;

pub use board::*;
pub use game::*;
pub use location::*;

/// The number of spaces on one edge of an Othello board.
pub const EDGE_LENGTH: usize = 8;

/// The number of spaces on an Othello board.
pub const NUM_SPACES: usize = 64;

/// The largest absolute-difference score a game can end with.
pub const MAX_SCORE: i8 = NUM_SPACES as i8;
