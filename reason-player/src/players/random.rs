//! A player that picks uniformly among its legal moves.

use crate::strategy::{Millis, Strategy, StrategyConfig};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use reason_othello::{Move, Player, Position};

/// Configuration for [`RandomPlayer`].
#[derive(Clone, Debug, Default)]
pub struct RandomConfig {
    /// Seed for reproducible games. Seeded from the OS if None.
    pub seed: Option<u64>,
}

impl RandomConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl StrategyConfig for RandomConfig {
    type Strategy = RandomPlayer;

    fn name(&self) -> String {
        "random".to_string()
    }

    fn build(&self, color: Player, _ms_total: Option<Millis>) -> RandomPlayer {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        RandomPlayer { color, rng }
    }
}

pub struct RandomPlayer {
    color: Player,
    rng: StdRng,
}

impl Strategy for RandomPlayer {
    fn choose_move(&mut self, position: Position, _: Move, _: Option<Millis>) -> Move {
        position
            .legal_moves(self.color)
            .choose(&mut self.rng)
            .map_or(Move::Pass, Move::Piece)
    }
}
