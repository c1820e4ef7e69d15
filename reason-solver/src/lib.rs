//! An exact endgame solver for Othello.
//!
//! Once few enough squares are empty, the game tree is small enough to search to the end.
//! [`solve_game`] finds the best move for the active player by negamax alpha-beta search.

pub mod search;

use reason_othello::{Board, Move, MAX_SCORE};

/// How precisely the solver should resolve the final score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveMode {
    /// Determine the exact final disc difference. Slower.
    Exact,
    /// Only distinguish wins, losses, and draws. Faster.
    WinLossDraw,
}

impl Default for SolveMode {
    fn default() -> Self {
        SolveMode::WinLossDraw
    }
}

impl SolveMode {
    /// The search window bound: scores are clamped to `[-bound, bound]`.
    #[inline]
    fn bound(self) -> i8 {
        match self {
            SolveMode::Exact => MAX_SCORE,
            SolveMode::WinLossDraw => 1,
        }
    }
}

/// The result of solving a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Solution {
    /// A provably best move for the active player.
    pub best_move: Move,
    /// The final disc difference for the active player under best play,
    /// clamped to `[-1, 1]` when solving for win/loss/draw.
    pub score: i8,
}

/// Solve the game, trying to determine the exact score.
/// Takes longer, but can be valuable for debugging or winning by a margin.
pub fn solve_exact(board: Board) -> i8 {
    search::window(board, -MAX_SCORE, MAX_SCORE)
}

// Solve the game, caring only about solving for a win, loss, or draw.
// Faster, but provides less information.
pub fn solve_win_loss_draw(board: Board) -> i8 {
    search::window(board, -1, 1)
}

/// Find the best move for the active player and the score it leads to.
/// Returns [`Move::Pass`] if the active player has no legal move.
pub fn solve_game(board: Board, mode: SolveMode) -> Solution {
    let (best_location, score) = search::root(board, mode.bound());

    Solution {
        best_move: best_location.map_or(Move::Pass, Move::Piece),
        score,
    }
}
