//! Sliding-piece ray tables: full rays, magic-relevant occupancy masks, and the
//! `ray_between`/`on_line` tables used by pin and check-ray detection.

use std::sync::LazyLock;

use crate::types::{Bitboard, Square};

const ROOK_ARMS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_ARMS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const fn ray_full(sq: usize, dr: i8, df: i8) -> u64 {
    let mut bb = 0u64;
    let mut r = (sq / 8) as i8 + dr;
    let mut f = (sq % 8) as i8 + df;
    while r >= 0 && r < 8 && f >= 0 && f < 8 {
        bb |= 1u64 << (r * 8 + f);
        r += dr;
        f += df;
    }
    bb
}

/// Same as [`ray_full`] but excludes the final (edge) square, matching the classic
/// magic-bitboard "relevant occupancy" convention.
const fn ray_relevant(sq: usize, dr: i8, df: i8) -> u64 {
    let mut bb = 0u64;
    let mut r = (sq / 8) as i8 + dr;
    let mut f = (sq % 8) as i8 + df;
    loop {
        if !(r >= 0 && r < 8 && f >= 0 && f < 8) {
            break;
        }
        let nr = r + dr;
        let nf = f + df;
        let next_on_board = nr >= 0 && nr < 8 && nf >= 0 && nf < 8;
        if !next_on_board {
            break;
        }
        bb |= 1u64 << (r * 8 + f);
        r += dr;
        f += df;
    }
    bb
}

const fn build_table(arms: [(i8, i8); 4], relevant: bool) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let mut bb = 0u64;
        let mut i = 0usize;
        while i < arms.len() {
            let (dr, df) = arms[i];
            bb |= if relevant { ray_relevant(sq, dr, df) } else { ray_full(sq, dr, df) };
            i += 1;
        }
        table[sq] = bb;
        sq += 1;
    }
    table
}

static ROOK_FULL_RAYS: [u64; 64] = build_table(ROOK_ARMS, false);
static ROOK_RAY_MASK: [u64; 64] = build_table(ROOK_ARMS, true);
static BISHOP_FULL_RAYS: [u64; 64] = build_table(BISHOP_ARMS, false);
static BISHOP_RAY_MASK: [u64; 64] = build_table(BISHOP_ARMS, true);

#[inline]
#[must_use]
pub fn rook_full_rays(sq: Square) -> Bitboard {
    Bitboard(ROOK_FULL_RAYS[sq.as_index()])
}

#[inline]
#[must_use]
pub fn rook_ray_mask(sq: Square) -> Bitboard {
    Bitboard(ROOK_RAY_MASK[sq.as_index()])
}

#[inline]
#[must_use]
pub fn bishop_full_rays(sq: Square) -> Bitboard {
    Bitboard(BISHOP_FULL_RAYS[sq.as_index()])
}

#[inline]
#[must_use]
pub fn bishop_ray_mask(sq: Square) -> Bitboard {
    Bitboard(BISHOP_RAY_MASK[sq.as_index()])
}

/// Step direction from `a` toward `b` if the two squares are colinear on a rank, file, or
/// diagonal; `None` otherwise.
fn colinear_step(a: usize, b: usize) -> Option<(i8, i8)> {
    let (ar, af) = ((a / 8) as i8, (a % 8) as i8);
    let (br, bf) = ((b / 8) as i8, (b % 8) as i8);
    let dr = br - ar;
    let df = bf - af;
    if a == b {
        return None;
    }
    if dr == 0 {
        Some((0, df.signum()))
    } else if df == 0 {
        Some((dr.signum(), 0))
    } else if dr.abs() == df.abs() {
        Some((dr.signum(), df.signum()))
    } else {
        None
    }
}

struct BetweenTables {
    exclusive: Vec<u64>,
    inclusive: Vec<u64>,
    on_line: Vec<u64>,
}

fn build_between_tables() -> BetweenTables {
    let mut exclusive = vec![0u64; 64 * 64];
    let mut inclusive = vec![0u64; 64 * 64];
    let mut on_line = vec![0u64; 64 * 64];

    for a in 0..64usize {
        for b in 0..64usize {
            if a == b {
                continue;
            }
            if let Some((dr, df)) = colinear_step(a, b) {
                let mut bb = 0u64;
                let (mut r, mut f) = ((a / 8) as i8 + dr, (a % 8) as i8 + df);
                loop {
                    let idx = (r * 8 + f) as usize;
                    if idx == b {
                        break;
                    }
                    bb |= 1u64 << idx;
                    r += dr;
                    f += df;
                }
                exclusive[a * 64 + b] = bb;
                inclusive[a * 64 + b] = bb | (1u64 << b);

                let full_line = ray_full(a, dr, df) | ray_full(a, -dr, -df) | (1u64 << a);
                on_line[a * 64 + b] = full_line;
            }
        }
    }

    BetweenTables { exclusive, inclusive, on_line }
}

static BETWEEN: LazyLock<BetweenTables> = LazyLock::new(build_between_tables);

/// Squares strictly between `from` and `to` along a shared rank, file, or diagonal.
/// Empty if the two squares are not colinear (or identical).
#[inline]
#[must_use]
pub fn ray_between_exclusive(from: Square, to: Square) -> Bitboard {
    Bitboard(BETWEEN.exclusive[from.as_index() * 64 + to.as_index()])
}

/// Same as [`ray_between_exclusive`] but includes `to`.
#[inline]
#[must_use]
pub fn ray_between_inclusive(from: Square, to: Square) -> Bitboard {
    Bitboard(BETWEEN.inclusive[from.as_index() * 64 + to.as_index()])
}

/// The full rank/file/diagonal line containing both squares, or empty if they do not share one.
#[inline]
#[must_use]
pub fn on_line(a: Square, b: Square) -> Bitboard {
    Bitboard(BETWEEN.on_line[a.as_index() * 64 + b.as_index()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_ray_mask_excludes_edges() {
        let a1 = Square::new(0);
        let mask = rook_ray_mask(a1);
        // a1's rook mask should not include h1 or a8 (the edge squares of each arm).
        assert!(!mask.contains(Square::new(7)));
        assert!(!mask.contains(Square::new(56)));
        assert!(mask.contains(Square::new(1)));
        assert!(mask.contains(Square::new(8)));
    }

    #[test]
    fn bishop_full_rays_center() {
        let d4 = Square::new(27);
        let rays = bishop_full_rays(d4);
        assert!(rays.contains(Square::new(0))); // a1
        assert!(rays.contains(Square::new(63))); // h8
    }

    #[test]
    fn ray_between_exclusive_excludes_endpoints() {
        let a1 = Square::new(0);
        let a4 = Square::new(24);
        let between = ray_between_exclusive(a1, a4);
        assert!(!between.contains(a1));
        assert!(!between.contains(a4));
        assert!(between.contains(Square::new(8)));
        assert!(between.contains(Square::new(16)));
        assert_eq!(between.popcount(), 2);
    }

    #[test]
    fn ray_between_inclusive_adds_destination() {
        let a1 = Square::new(0);
        let a4 = Square::new(24);
        let between = ray_between_inclusive(a1, a4);
        assert!(between.contains(a4));
        assert!(!between.contains(a1));
    }

    #[test]
    fn non_colinear_squares_have_empty_rays() {
        let a1 = Square::new(0);
        let b3 = Square::new(17);
        assert!(ray_between_exclusive(a1, b3).is_empty());
        assert!(on_line(a1, b3).is_empty());
    }

    #[test]
    fn on_line_covers_full_rank() {
        let a1 = Square::new(0);
        let d1 = Square::new(3);
        let line = on_line(a1, d1);
        assert_eq!(line, Bitboard::RANK_1);
    }
}
