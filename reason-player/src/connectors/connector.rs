use super::ProtocolError;
use crate::strategy::Millis;
use reason_othello::{Move, Player};
use std::io;

/// One line of referee input: what the opponent just did and how much time we have left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefereeTurn {
    /// [`Move::Pass`] if the opponent passed, or if we move first.
    pub opponent_move: Move,
    /// Milliseconds left on our clock. Zero or negative means unlimited.
    pub ms_left: Millis,
}

/// A player-facing abstract interface to a way of playing Othello with "the outside world."
pub trait Connector {
    /// Alert the [`Connector`] that we're finished with setup, announcing the strategy by name.
    /// This must be called before the game can progress.
    fn set_ready(&mut self, name: &str) -> io::Result<()>;

    /// Find out what color we're playing.
    fn get_player_color(&self) -> Player;

    /// Block until the referee's next turn arrives.
    /// Returns None once the referee closes the connection.
    fn next_turn(&mut self) -> Result<Option<RefereeTurn>, ProtocolError>;

    /// Send our move for this turn.
    fn make_move(&mut self, mv: Move) -> io::Result<()>;
}
