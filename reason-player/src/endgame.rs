//! Hands the endgame to the exact solver.
//!
//! Late in the game the remaining tree is small enough to search to the end, which beats
//! any heuristic. [`WithSolver`] wraps another [`StrategyConfig`] so that once few enough
//! squares are empty, every move comes from [`reason_solver::solve_game`] instead.
//! A slice of the total time budget is reserved for the solver up front, so the inner
//! strategy never spends it.

use crate::strategy::{reserve, Millis, Strategy, StrategyConfig};
use reason_othello::{Move, Player, Position};
use reason_solver::SolveMode;
use tracing::{debug, info};

/// Configuration for a strategy that switches to exact solving at a fixed depth.
#[derive(Clone, Debug)]
pub struct WithSolver<C> {
    inner: C,
    depth: u8,
    reserved_ms: Millis,
    mode: SolveMode,
}

impl<C> WithSolver<C> {
    /// Solve positions with at most `depth` empty squares, reserving `reserved_ms`
    /// of the total budget for doing so.
    pub fn new(inner: C, depth: u8, reserved_ms: Millis, mode: SolveMode) -> Self {
        Self {
            inner,
            depth,
            reserved_ms,
            mode,
        }
    }

    /// Change how precisely the solver resolves the final score.
    pub fn with_mode(mut self, mode: SolveMode) -> Self {
        self.mode = mode;
        self
    }
}

impl<C: StrategyConfig> StrategyConfig for WithSolver<C> {
    type Strategy = SolverHandoff<C::Strategy>;

    fn name(&self) -> String {
        format!("{} + solver@{}", self.inner.name(), self.depth)
    }

    fn build(&self, color: Player, ms_total: Option<Millis>) -> Self::Strategy {
        let inner_total = reserve(ms_total, self.reserved_ms);
        debug!(?inner_total, reserved_ms = self.reserved_ms, "Reserving solver time");

        SolverHandoff {
            inner: self.inner.build(color, inner_total),
            color,
            depth: self.depth,
            reserved_ms: self.reserved_ms,
            mode: self.mode,
            solving: false,
        }
    }
}

/// A strategy that delegates to `inner` until at most `depth` squares are empty,
/// then plays solver moves for the rest of the game.
#[derive(Debug)]
pub struct SolverHandoff<S> {
    inner: S,
    color: Player,
    depth: u8,
    reserved_ms: Millis,
    mode: SolveMode,
    solving: bool,
}

impl<S> SolverHandoff<S> {
    /// Whether the solver has taken over.
    pub fn is_solving(&self) -> bool {
        self.solving
    }
}

impl<S: Strategy> Strategy for SolverHandoff<S> {
    fn choose_move(
        &mut self,
        position: Position,
        opponent_move: Move,
        ms_left: Option<Millis>,
    ) -> Move {
        let empties = position.count_empties();

        // Empties never increase, so once this holds it holds for the rest of the game.
        if empties <= self.depth {
            if !self.solving {
                info!(empties, "Handing off to the endgame solver");
                self.solving = true;
            }

            let board = position.player_view(self.color);
            if board.get_moves().is_empty() {
                return Move::Pass;
            }

            info!(empties, "Running solver");
            let solution = reason_solver::solve_game(board, self.mode);
            debug!(score = solution.score, "Solved position");
            return solution.best_move;
        }

        self.inner
            .choose_move(position, opponent_move, reserve(ms_left, self.reserved_ms))
    }
}
