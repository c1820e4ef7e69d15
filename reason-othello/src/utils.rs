//! Text rendering shared by the board types.

use crate::{EDGE_LENGTH, NUM_SPACES};
use std::fmt;

const COLUMN_LABELS: &str = "A B C D E F G H";

/// Write one character per square as a labeled grid, starting from A1 in row-major order.
/// Fails unless `squares` yields exactly one character per square.
pub fn format_grid<I>(squares: I, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    I: IntoIterator<Item = char>,
{
    let squares: Vec<char> = squares.into_iter().collect();
    if squares.len() != NUM_SPACES {
        return Err(fmt::Error);
    }

    write!(f, "   {}", COLUMN_LABELS)?;
    for (row, rank) in squares.chunks(EDGE_LENGTH).enumerate() {
        write!(f, "\n {} ", row + 1)?;
        for square in rank {
            write!(f, "{} ", square)?;
        }
    }

    Ok(())
}
