//! The interface every move-choosing algorithm implements, and time-budget helpers.

use crate::endgame::WithSolver;
use reason_othello::{Move, Player, Position};
use reason_solver::SolveMode;
use std::time::Duration;

/// Milliseconds of thinking time. Signed: reservations may drive a budget below zero.
pub type Millis = i64;

/// A way of choosing moves for one color, for the length of one game.
pub trait Strategy {
    /// Choose a move for this strategy's color.
    ///
    /// `position` already includes the opponent's last move. `opponent_move` is
    /// [`Move::Pass`] at the start of the game or if the opponent passed.
    /// `ms_left` is the time remaining for this player, or None if unlimited.
    ///
    /// Must return a legal placement, or [`Move::Pass`] if and only if none exists.
    fn choose_move(&mut self, position: Position, opponent_move: Move, ms_left: Option<Millis>)
        -> Move;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn choose_move(
        &mut self,
        position: Position,
        opponent_move: Move,
        ms_left: Option<Millis>,
    ) -> Move {
        (**self).choose_move(position, opponent_move, ms_left)
    }
}

/// Builds a [`Strategy`] once a game's color and time budget are known.
pub trait StrategyConfig {
    type Strategy: Strategy;

    /// A short human-readable name, used in logs.
    fn name(&self) -> String;

    /// Build a strategy for `color` with `ms_total` milliseconds for the whole game
    /// (None if unlimited). Must be cheap.
    fn build(&self, color: Player, ms_total: Option<Millis>) -> Self::Strategy;

    /// Hand positions with at most `depth` empty squares to the exact solver,
    /// reserving `reserved_ms` of the total budget for it.
    fn with_depth_solver(self, depth: u8, reserved_ms: Millis) -> WithSolver<Self>
    where
        Self: Sized,
    {
        WithSolver::new(self, depth, reserved_ms, SolveMode::default())
    }
}

/// Subtract a reservation from a finite budget. Unlimited budgets stay unlimited,
/// and finite budgets are not clamped at zero.
#[inline]
pub fn reserve(budget: Option<Millis>, reserved_ms: Millis) -> Option<Millis> {
    budget.map(|ms| ms - reserved_ms)
}

/// Estimate how many more placements `color` will make this game.
#[inline]
pub fn moves_remaining(position: Position) -> u32 {
    (u32::from(position.count_empties()) + 1) / 2
}

/// Split the remaining time evenly over this player's remaining moves,
/// keeping `buffer_ms` back each turn. None if time is unlimited.
pub fn move_budget(ms_left: Option<Millis>, position: Position, buffer_ms: Millis) -> Option<Duration> {
    let ms_left = ms_left?;
    let per_move = ms_left / Millis::from(moves_remaining(position).max(1)) - buffer_ms;
    Some(Duration::from_millis(per_move.max(0) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_finite_and_unlimited() {
        assert_eq!(reserve(Some(10_000), 2_000), Some(8_000));
        assert_eq!(reserve(None, 2_000), None);
        // No clamping.
        assert_eq!(reserve(Some(1_000), 2_000), Some(-1_000));
    }

    #[test]
    fn budget_per_move() {
        let start = Position::starting();
        assert_eq!(moves_remaining(start), 30);
        assert_eq!(
            move_budget(Some(30_000), start, 40),
            Some(Duration::from_millis(960))
        );
        assert_eq!(move_budget(None, start, 40), None);
        assert_eq!(move_budget(Some(-500), start, 40), Some(Duration::from_millis(0)));
    }
}
