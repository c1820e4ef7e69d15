//! Low-level bitboard operations.
//!
//! For efficiency, [`Bitboard`] operations are unchecked and may produce
//! inconsistent boards if invalid data is passed.
//!
//! Under the hood, all these operations work on u64 bitboards. By convention,
//! the MSB is the upper-left of the board (A1), and uses row-major order.

use crate::{utils, NUM_SPACES};
use derive_more::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, From, Into, Not,
};
use std::fmt::{self, Display, Formatter};

/// Holds a single bit per location on an Othello board.
/// Wraps [`u64`] for efficient bit-twiddling, but avoids mixing with numerics.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    PartialOrd,
    Ord,
    Default,
    From,
    Into,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
pub struct Bitboard(u64);

/// Starting bitboard for Black.
pub const BLACK_START: Bitboard = Bitboard(0x0000000810000000);

/// Starting bitboard for White.
pub const WHITE_START: Bitboard = Bitboard(0x0000001008000000);

// Masks selecting everything except the far-left and far-right columns, in shift terms.
const NOT_A_FILE: u64 = 0xfefefefefefefefe;
const NOT_H_FILE: u64 = 0x7f7f7f7f7f7f7f7f;
const FULL_MASK: u64 = 0xffffffffffffffff;

// Mask to clip off the invalid wraparound pieces on both edges.
const EDGE_MASK: u64 = 0x7e7e7e7e7e7e7e7e;

// Shifts for each direction pair: E/W, N/S, NW/SE, NE/SW.
// The first direction is handled by SHL, the second by SHR.
const SHIFTS: [u32; 4] = [1, 8, 7, 9];

// Propagator masks applied when left-shifting or right-shifting along each direction.
const LEFT_MASKS: [u64; 4] = [NOT_A_FILE, FULL_MASK, NOT_H_FILE, NOT_A_FILE];
const RIGHT_MASKS: [u64; 4] = [NOT_H_FILE, FULL_MASK, NOT_A_FILE, NOT_H_FILE];

impl Display for Bitboard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        utils::format_grid(
            self.into_iter().map(|bit| match bit {
                false => '.',
                true => '#',
            }),
            f,
        )
    }
}

impl Bitboard {
    /// Count the number of occupied spaces in the bitboard.
    #[inline]
    pub fn count_occupied(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Count the number of empty spaces in the bitboard.
    #[inline]
    pub fn count_empty(self) -> u8 {
        self.0.count_zeros() as u8
    }

    /// Return true if this bitboard is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return true if every bit in `other` is also set in this bitboard.
    #[inline]
    pub fn contains(self, other: Bitboard) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Score a board as: # my pieces - # opponent pieces.
/// Inconsistent if both players have a piece at the same location.
#[inline]
pub fn score_absolute_difference(active: Bitboard, opponent: Bitboard) -> i8 {
    (active.0.count_ones() as i8) - (opponent.0.count_ones() as i8)
}

/// Compute a mask of the legal moves for the active player from
/// masks of the active player's pieces and the opponent's pieces.
/// The result is meaningless if an invalid Othello board is specified.
// Kogge-Stone fill, adapted from Sam Blazes' Coin, released under the Apache 2.0 license:
// https://github.com/Tenebryo/coin/blob/master/bitboard/src/find_moves_fast.rs
#[inline]
pub fn get_move_mask(active: Bitboard, opponent: Bitboard) -> Bitboard {
    let opponent_edge_mask = EDGE_MASK & opponent.0;

    // Opponent pieces a run may pass through, for each direction pair.
    // Vertical runs cannot wrap around, so they use the whole opponent mask.
    let masks: [u64; 4] = [
        opponent_edge_mask,
        opponent.0,
        opponent_edge_mask,
        opponent_edge_mask,
    ];

    let mut captures = 0;
    for (&shift, &mask) in SHIFTS.iter().zip(masks.iter()) {
        // Smear our pieces in each direction while masking invalid flips.
        let mut flip_l = active.0 | (mask & (active.0 << shift));
        let mut masks_l = mask & (mask << shift);
        flip_l |= masks_l & (flip_l << (2 * shift));
        masks_l &= masks_l << (2 * shift);
        flip_l |= masks_l & (flip_l << (4 * shift));

        let mut flip_r = active.0 | (mask & (active.0 >> shift));
        let mut masks_r = mask & (mask >> shift);
        flip_r |= masks_r & (flip_r >> (2 * shift));
        masks_r &= masks_r >> (2 * shift);
        flip_r |= masks_r & (flip_r >> (4 * shift));

        // One extra shift past each run of flippable pieces.
        captures |= ((flip_l & mask) << shift) | ((flip_r & mask) >> shift);
    }

    // Moves are the intersection of empties and capturing squares.
    let empties = !(active | opponent).0;
    Bitboard(empties & captures)
}

/// Compute the mask of opponent pieces flipped by playing `move_mask`.
/// `move_mask` must be a one-hot bitboard on an empty square.
#[inline]
pub fn get_flip_mask(active: Bitboard, opponent: Bitboard, move_mask: Bitboard) -> Bitboard {
    let mut flip_mask = 0;

    for i in 0..SHIFTS.len() {
        let shift = SHIFTS[i];

        // Flood from the new piece and from our pieces toward each other, through opponent pieces.
        // Their intersection is exactly the bracketed opponent pieces.
        let from_move_l = occluded_fill_left(move_mask.0, opponent.0 & LEFT_MASKS[i], shift);
        let from_active_r = occluded_fill_right(active.0, opponent.0 & RIGHT_MASKS[i], shift);
        let from_active_l = occluded_fill_left(active.0, opponent.0 & LEFT_MASKS[i], shift);
        let from_move_r = occluded_fill_right(move_mask.0, opponent.0 & RIGHT_MASKS[i], shift);

        flip_mask |= (from_move_l & from_active_r) | (from_active_l & from_move_r);
    }

    Bitboard(flip_mask)
}

/// Compute an updated board after a given move is made, returning new bitboards
/// for the active player and the opponent. `move_mask` must be a one-hot bitboard
/// indicating the move location. The result is meaningless if an invalid Othello
/// board or `move_mask` is provided.
#[inline]
pub fn apply_move(
    active: Bitboard,
    opponent: Bitboard,
    move_mask: Bitboard,
) -> (Bitboard, Bitboard) {
    let flip_mask = get_flip_mask(active, opponent, move_mask);

    let new_active = (active ^ flip_mask) | move_mask;
    let new_opponent = opponent ^ flip_mask;

    (new_active, new_opponent)
}

#[inline]
fn occluded_fill_left(mut gen: u64, mut pro: u64, shift: u32) -> u64 {
    gen |= pro & (gen << shift);
    pro &= pro << shift;
    gen |= pro & (gen << (2 * shift));
    pro &= pro << (2 * shift);
    gen | (pro & (gen << (4 * shift)))
}

#[inline]
fn occluded_fill_right(mut gen: u64, mut pro: u64, shift: u32) -> u64 {
    gen |= pro & (gen >> shift);
    pro &= pro >> shift;
    gen |= pro & (gen >> (2 * shift));
    pro &= pro >> (2 * shift);
    gen | (pro & (gen >> (4 * shift)))
}

/// Iterator for the bits in a [`Bitboard`].
#[derive(Clone, Copy, Debug)]
pub struct Bits {
    remaining: usize,
    bitboard: Bitboard,
}

impl Iterator for Bits {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let bitmask = Bitboard::from(1u64 << (self.remaining - 1));
        let bit = !(self.bitboard & bitmask).is_empty();
        self.remaining -= 1;

        Some(bit)
    }
}

impl ExactSizeIterator for Bits {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// Iterate over the bits in row-major order.
impl IntoIterator for Bitboard {
    type Item = bool;
    type IntoIter = Bits;

    fn into_iter(self) -> Self::IntoIter {
        Bits {
            remaining: NUM_SPACES,
            bitboard: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_moves() {
        // D3, C4, F5, E6 in MSB-first row-major order.
        let expected = Bitboard::from(0x0000102004080000);
        assert_eq!(get_move_mask(BLACK_START, WHITE_START), expected);
        assert_eq!(get_move_mask(BLACK_START, WHITE_START).count_occupied(), 4);
    }

    #[test]
    fn apply_opening_move() {
        // Black plays D3: flips D4.
        let d3 = Bitboard::from(1u64 << (63 - 19));
        let d4 = Bitboard::from(1u64 << (63 - 27));
        let (black, white) = apply_move(BLACK_START, WHITE_START, d3);

        assert_eq!(black, BLACK_START | d3 | d4);
        assert_eq!(white, WHITE_START ^ d4);
        assert_eq!(black.count_occupied(), 4);
        assert_eq!(white.count_occupied(), 1);
    }

    #[test]
    fn no_wraparound_captures() {
        // Active on H1, opponent on A2: shifting east from H1 must not reach A2's row.
        let active = Bitboard::from(1u64 << (63 - 7));
        let opponent = Bitboard::from(1u64 << (63 - 8));
        assert!(get_move_mask(active, opponent).is_empty());
    }

    #[test]
    fn bits_iterate_row_major() {
        let bits: Vec<bool> = Bitboard::from(1u64 << 63).into_iter().collect();
        assert_eq!(bits.len(), NUM_SPACES);
        assert!(bits[0]);
        assert!(bits[1..].iter().all(|b| !b));
    }

    #[test]
    fn scores() {
        assert_eq!(score_absolute_difference(BLACK_START, WHITE_START), 0);
        let black = BLACK_START | WHITE_START;
        assert_eq!(score_absolute_difference(black, Bitboard::default()), 4);
        assert_eq!(score_absolute_difference(Bitboard::default(), black), -4);
    }
}
