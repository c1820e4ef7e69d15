//! Concrete strategies, and a way to pick one at runtime.

pub mod random;

pub use random::{RandomConfig, RandomPlayer};

use crate::mcts::MctsConfig;
use crate::strategy::{Millis, Strategy, StrategyConfig};
use reason_othello::Player;

/// The built-in strategies, as named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PlayerKind {
    /// Uniformly random legal moves.
    Random,
    /// Monte-carlo tree search with random rollouts.
    Mcts,
}

/// Configuration for any built-in strategy, chosen at runtime.
#[derive(Clone, Debug)]
pub enum BuiltinConfig {
    Random(RandomConfig),
    Mcts(MctsConfig),
}

impl BuiltinConfig {
    /// The default configuration for `kind`, optionally seeded.
    pub fn new(kind: PlayerKind, seed: Option<u64>) -> Self {
        match kind {
            PlayerKind::Random => BuiltinConfig::Random(RandomConfig { seed }),
            PlayerKind::Mcts => BuiltinConfig::Mcts(MctsConfig {
                seed,
                ..MctsConfig::default()
            }),
        }
    }
}

impl StrategyConfig for BuiltinConfig {
    type Strategy = Box<dyn Strategy>;

    fn name(&self) -> String {
        match self {
            BuiltinConfig::Random(config) => config.name(),
            BuiltinConfig::Mcts(config) => config.name(),
        }
    }

    fn build(&self, color: Player, ms_total: Option<Millis>) -> Box<dyn Strategy> {
        match self {
            BuiltinConfig::Random(config) => Box::new(config.build(color, ms_total)),
            BuiltinConfig::Mcts(config) => Box::new(config.build(color, ms_total)),
        }
    }
}
