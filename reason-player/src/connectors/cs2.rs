//! [`Connector`] for the CS2 referee's line protocol.
//!
//! The referee writes one line per turn, `opp_x opp_y ms_left`, where a negative `opp_x`
//! means the opponent passed and a non-positive `ms_left` means unlimited time.
//! We answer with one line, `x y`, writing `-1 -1` to pass. Coordinates are zero-indexed,
//! with `x` the column and `y` the row.

use super::{Connector, RefereeTurn};
use crate::strategy::Millis;
use derive_more::{Display, Error};
use reason_othello::{Location, Move, Player};
use std::convert::TryFrom;
use std::io::{self, BufRead, Write};
use std::num::ParseIntError;
use tracing::trace;

/// The coordinates written for a pass.
const PASS_COORDS: (i64, i64) = (-1, -1);

/// A referee line we couldn't understand. Always fatal: there is no way to resynchronize.
#[derive(Debug, Display, Error)]
pub enum ProtocolError {
    #[display(fmt = "failed to read from the referee: {}", _0)]
    Io(io::Error),
    #[display(fmt = "referee line {:?} is missing {}", line, field)]
    MissingField { field: &'static str, line: String },
    #[display(fmt = "referee line {:?} has a non-integer {}", line, field)]
    InvalidInteger {
        field: &'static str,
        line: String,
        source: ParseIntError,
    },
    #[display(fmt = "referee line {:?} has more than three fields", line)]
    ExtraField { line: String },
    #[display(fmt = "opponent move ({}, {}) is off the board", x, y)]
    LocationOutOfRange { x: i64, y: i64 },
}

impl From<io::Error> for ProtocolError {
    fn from(err: io::Error) -> Self {
        ProtocolError::Io(err)
    }
}

/// Speaks the CS2 protocol over any line-oriented reader and writer,
/// typically locked stdin and stdout.
pub struct Cs2Connector<R, W> {
    player: Player,
    reader: R,
    writer: W,
    buffer: String,
}

impl<R: BufRead, W: Write> Cs2Connector<R, W> {
    pub fn new(player: Player, reader: R, writer: W) -> Self {
        Self {
            player,
            reader,
            writer,
            buffer: String::new(),
        }
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl Cs2Connector<io::StdinLock<'static>, io::StdoutLock<'static>> {
    /// Connect to a referee over this process's stdin and stdout.
    pub fn stdio(player: Player) -> Self {
        Self::new(player, io::stdin().lock(), io::stdout().lock())
    }
}

impl<R: BufRead, W: Write> Connector for Cs2Connector<R, W> {
    fn set_ready(&mut self, name: &str) -> io::Result<()> {
        // The referee discards one line before the first turn.
        writeln!(self.writer, "Player ready: {} ({})", name, self.player)?;
        self.writer.flush()
    }

    fn get_player_color(&self) -> Player {
        self.player
    }

    fn next_turn(&mut self) -> Result<Option<RefereeTurn>, ProtocolError> {
        self.buffer.clear(); // read_line appends
        let num_bytes_read = self.reader.read_line(&mut self.buffer)?;
        if num_bytes_read == 0 {
            // EOF: the referee has exited.
            return Ok(None);
        }

        trace!(line = self.buffer.trim_end(), "Referee line");
        parse_turn(&self.buffer).map(Some)
    }

    fn make_move(&mut self, mv: Move) -> io::Result<()> {
        let (x, y) = move_to_coords(mv);
        writeln!(self.writer, "{} {}", x, y)?;
        self.writer.flush()
    }
}

/// Parse one referee line: `opp_x opp_y ms_left`.
pub fn parse_turn(line: &str) -> Result<RefereeTurn, ProtocolError> {
    let mut fields = line.split_whitespace();
    let mut next_int = |field: &'static str| -> Result<i64, ProtocolError> {
        let token = fields.next().ok_or_else(|| ProtocolError::MissingField {
            field,
            line: line.trim_end().to_string(),
        })?;

        token
            .parse::<i64>()
            .map_err(|source| ProtocolError::InvalidInteger {
                field,
                line: line.trim_end().to_string(),
                source,
            })
    };

    let x = next_int("the opponent's x coordinate")?;
    let y = next_int("the opponent's y coordinate")?;
    let ms_left: Millis = next_int("the time remaining")?;

    if fields.next().is_some() {
        return Err(ProtocolError::ExtraField {
            line: line.trim_end().to_string(),
        });
    }

    Ok(RefereeTurn {
        opponent_move: coords_to_move(x, y)?,
        ms_left,
    })
}

/// Interpret referee coordinates. Any negative `x` is a pass.
pub fn coords_to_move(x: i64, y: i64) -> Result<Move, ProtocolError> {
    if x < 0 {
        return Ok(Move::Pass);
    }

    let row = usize::try_from(y).ok();
    let col = usize::try_from(x).ok();
    row.zip(col)
        .and_then(|(row, col)| Location::from_coords(row, col))
        .map(Move::Piece)
        .ok_or(ProtocolError::LocationOutOfRange { x, y })
}

/// Get the coordinates to send for a move.
pub fn move_to_coords(mv: Move) -> (i64, i64) {
    match mv {
        Move::Pass => PASS_COORDS,
        Move::Piece(loc) => {
            let (row, col) = loc.to_coords();
            (col as i64, row as i64)
        }
    }
}
