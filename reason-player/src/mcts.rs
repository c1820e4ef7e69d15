//! Code for monte-carlo tree search, used for earlygame and midgame play.
//!
//! Leaves are valued by random rollouts to the end of the game, and actions are
//! selected by UCT. Positions are stored in a table keyed by player-relative
//! [`Board`], so transpositions share statistics.

use crate::strategy::{move_budget, Millis, Strategy, StrategyConfig};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use reason_othello::{Board, Move, Player, Position};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Configuration for [`MctsPlayer`].
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Weight of the UCT exploration term.
    pub exploration: f64,
    /// Milliseconds held back from each turn's share of the clock.
    pub turn_buffer_ms: Millis,
    /// Simulations per move when time is unlimited.
    pub simulations: u32,
    /// Seed for reproducible games. Seeded from the OS if None.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: 4.0,
            turn_buffer_ms: 40,
            simulations: 2_000,
            seed: None,
        }
    }
}

impl StrategyConfig for MctsConfig {
    type Strategy = MctsPlayer;

    fn name(&self) -> String {
        "mcts".to_string()
    }

    fn build(&self, color: Player, ms_total: Option<Millis>) -> MctsPlayer {
        if let Some(ms_total) = ms_total {
            debug!(
                "Time per move: {:.2} s",
                2.0 * ms_total as f64 / (reason_othello::NUM_SPACES as f64 * 1000.0)
            );
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        MctsPlayer {
            color,
            config: self.clone(),
            rng,
        }
    }
}

pub struct MctsPlayer {
    color: Player,
    config: MctsConfig,
    rng: StdRng,
}

/// How long a single search may run.
#[derive(Clone, Copy, Debug)]
enum SearchLimit {
    Time(Duration),
    Simulations(u32),
}

impl Strategy for MctsPlayer {
    fn choose_move(&mut self, position: Position, _: Move, ms_left: Option<Millis>) -> Move {
        let root = position.player_view(self.color);

        // Nothing to search with zero or one legal moves.
        let mut moves = root.get_moves();
        match moves.len() {
            0 => return Move::Pass,
            1 => return moves.next().map_or(Move::Pass, Move::Piece),
            _ => {}
        }

        let limit = match move_budget(ms_left, position, self.config.turn_buffer_ms) {
            Some(budget) => SearchLimit::Time(budget),
            None => SearchLimit::Simulations(self.config.simulations),
        };

        let mut tree = Mcts::new(root, self.config.exploration);
        let start = Instant::now();
        let mut simulations = 0;

        // Always run at least one simulation, so the root is expanded even with no time left.
        loop {
            tree.step(&mut self.rng);
            simulations += 1;

            let done = match limit {
                SearchLimit::Time(budget) => start.elapsed() >= budget,
                SearchLimit::Simulations(max) => simulations >= max,
            };
            if done {
                break;
            }
        }

        debug!(
            simulations,
            elapsed_ms = start.elapsed().as_millis() as u64,
            ?limit,
            "Search finished"
        );

        tree.best_action()
            .or_else(|| root.get_moves().next().map(Move::Piece))
            .unwrap_or(Move::Pass)
    }
}

/// A search tree rooted at one position.
pub struct Mcts {
    root: Board,
    positions: HashMap<Board, PositionData>,
    exploration: f64,
}

#[derive(Debug)]
pub enum PositionData {
    Internal(InternalPosition),
    /// A finished game, valued for the active player.
    Leaf(f64),
}

#[derive(Debug)]
pub struct InternalPosition {
    actions: Vec<ActionData>,
}

#[derive(Copy, Clone, Debug)]
pub struct ActionData {
    action: Move,
    result: Board,

    visits: u32,
    total_value: f64,
}

impl Mcts {
    pub fn new(root: Board, exploration: f64) -> Self {
        Mcts {
            root,
            positions: HashMap::new(),
            exploration,
        }
    }

    /// Advance the MCTS tree by a single "simulation".
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        // Select a leaf of the current MCTS tree by UCT.
        let (leaf, trajectory, previously_visited) = self.select_leaf();

        // Expand the leaf (unless it's a game-ending state we already visited) and value it.
        let leaf_value = if previously_visited {
            self.positions.get(&leaf).map_or(0.0, PositionData::leaf_value)
        } else {
            let expanded = expand(leaf);
            let value = match expanded {
                PositionData::Leaf(value) => value,
                PositionData::Internal(_) => random_rollout(leaf, rng),
            };
            self.positions.insert(leaf, expanded);
            value
        };

        // Update the statistics up this trajectory for both players.
        self.update_statistics(&trajectory, leaf_value);
    }

    /// The most-visited action out of the root, if the root has been expanded.
    pub fn best_action(&self) -> Option<Move> {
        match self.positions.get(&self.root) {
            Some(PositionData::Internal(internal)) => internal
                .actions
                .iter()
                .fold(None, |best: Option<&ActionData>, action| match best {
                    Some(best) if best.visits >= action.visits => Some(best),
                    _ => Some(action),
                })
                .map(|action| action.action),
            _ => None,
        }
    }

    /// Pick a leaf node according to UCT tree traversal.
    /// Leaves are typically unexplored states, but may also be game-ending states.
    /// Returns: (leaf, trajectory, is_previously_visited).
    fn select_leaf(&self) -> (Board, Vec<usize>, bool) {
        let mut position = self.root;
        let mut trajectory: Vec<usize> = Vec::new();

        // Walk the tree of internal nodes by action until we hit a leaf or new node
        while let Some(position_data) = self.positions.get(&position) {
            match position_data {
                PositionData::Internal(internal_data) => {
                    let action_idx = self.uct_action_index(internal_data);
                    trajectory.push(action_idx);
                    position = internal_data.actions[action_idx].result;
                }
                // UCT led us to a game-ending state and we can't continue.
                PositionData::Leaf(_) => return (position, trajectory, true),
            }
        }

        // Board no longer in the tree: this is an unexplored node
        (position, trajectory, false)
    }

    /// Walk along the actions in `trajectory` and update statistics for each,
    /// based on `leaf_value`, the simulation result for the player active at its end.
    fn update_statistics(&mut self, trajectory: &[usize], leaf_value: f64) {
        let mut position = self.root;

        for (depth, &action_idx) in trajectory.iter().enumerate() {
            // Every action, passes included, hands the turn to the other player.
            let value = if (trajectory.len() - depth) % 2 == 0 {
                leaf_value
            } else {
                -leaf_value
            };

            match self.positions.get_mut(&position) {
                Some(PositionData::Internal(internal)) => {
                    let action = &mut internal.actions[action_idx];
                    action.visits += 1;
                    action.total_value += value;

                    // Proceed to next position
                    position = action.result;
                }
                _ => break,
            }
        }
    }

    /// Get the index of the UCT-suggested action out of a position.
    fn uct_action_index(&self, position: &InternalPosition) -> usize {
        let parent_visits = position.num_visits();
        let mut best_index = 0;
        let mut best_score: f64 = f64::NEG_INFINITY;

        for (index, action) in position.actions.iter().enumerate() {
            let score = action.uct_score(self.exploration, parent_visits);

            if score > best_score {
                best_index = index;
                best_score = score;
            }
        }

        best_index
    }
}

impl PositionData {
    fn leaf_value(&self) -> f64 {
        match self {
            PositionData::Leaf(value) => *value,
            PositionData::Internal(_) => 0.0,
        }
    }
}

impl InternalPosition {
    /// Get the number of times we've evaluated this node or a descendant.
    fn num_visits(&self) -> u32 {
        let child_visits: u32 = self.actions.iter().map(|action| action.visits).sum();
        child_visits + 1
    }
}

impl ActionData {
    fn new(parent: Board, action: Move) -> Self {
        let result = match action {
            Move::Pass => parent.pass(),
            Move::Piece(loc) => parent.apply_move(loc),
        };

        Self {
            action,
            result,
            visits: 0,
            total_value: 0.0,
        }
    }

    /// Compute the UCT score from the perspective of the active player.
    /// Unvisited actions are always tried first.
    fn uct_score(&self, exploration: f64, parent_visits: u32) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }

        let visits = self.visits as f64;
        let average_value = self.total_value / visits;
        average_value + exploration * ((parent_visits as f64).ln() / visits).sqrt()
    }
}

/// Expand a newly-visited position into a node.
fn expand(position: Board) -> PositionData {
    if position.is_finished() {
        return PositionData::Leaf(value_finished_game(position));
    }

    let moves = position.get_moves();
    let actions = if moves.is_empty() {
        // No legal moves: `actions` just contains the pass move.
        vec![ActionData::new(position, Move::Pass)]
    } else {
        moves
            .map(|loc| ActionData::new(position, Move::Piece(loc)))
            .collect()
    };

    PositionData::Internal(InternalPosition { actions })
}

/// Compute the value of a finished game for the active player: 1/-1/0 for win/loss/draw.
fn value_finished_game(board: Board) -> f64 {
    f64::from(board.score_absolute_difference().signum())
}

/// Play uniformly random moves to the end of the game.
/// Returns the outcome for the player active at `board`.
fn random_rollout<R: Rng>(mut board: Board, rng: &mut R) -> f64 {
    let mut sign = 1.0;

    loop {
        match board.get_moves().choose(rng) {
            Some(loc) => board = board.apply_move(loc),
            None if board.just_passed => break,
            None => board = board.pass(),
        }
        sign = -sign;
    }

    sign * value_finished_game(board)
}
