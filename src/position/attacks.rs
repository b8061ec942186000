//! Per-color-per-kind attacked-square caches, recomputed wholesale at construction time and
//! selectively after `make`.

use crate::magic;
use crate::tables;
use crate::types::{Bitboard, Color, Piece};

use super::state::Position;

const ALL_KINDS: [Piece; 6] =
    [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King];

fn recompute_kind(pos: &mut Position, color: Color, kind: Piece) {
    let bb = pos.piece_bb[color.index()][kind.index()];
    let attacks = match kind {
        Piece::Pawn => {
            let mut acc = Bitboard::EMPTY;
            for sq in bb.iter() {
                acc |= match color {
                    Color::White => tables::white_pawn_attacks(sq),
                    Color::Black => tables::black_pawn_attacks(sq),
                };
            }
            acc
        }
        Piece::Knight => {
            let mut acc = Bitboard::EMPTY;
            for sq in bb.iter() {
                acc |= tables::knight_attacks(sq);
            }
            acc
        }
        Piece::King => bb.lsb().map(tables::king_attacks).unwrap_or(Bitboard::EMPTY),
        Piece::Bishop => {
            let mut acc = Bitboard::EMPTY;
            for sq in bb.iter() {
                let occ = pos.all_bb.and(tables::bishop_ray_mask(sq));
                acc |= magic::bishop_attacks(sq, occ);
            }
            acc
        }
        Piece::Rook => {
            let mut acc = Bitboard::EMPTY;
            for sq in bb.iter() {
                let occ = pos.all_bb.and(tables::rook_ray_mask(sq));
                acc |= magic::rook_attacks(sq, occ);
            }
            acc
        }
        Piece::Queen => {
            let mut acc = Bitboard::EMPTY;
            for sq in bb.iter() {
                let rook_occ = pos.all_bb.and(tables::rook_ray_mask(sq));
                let bishop_occ = pos.all_bb.and(tables::bishop_ray_mask(sq));
                acc |= magic::queen_attacks(sq, rook_occ, bishop_occ);
            }
            acc
        }
    };
    pos.attack_by.by_kind[color.index()][kind.index()] = attacks;
}

/// Full rebuild of every per-kind cache and both unions. Used once at construction.
pub(crate) fn recompute_all(pos: &mut Position) {
    for &color in &[Color::White, Color::Black] {
        for &kind in &ALL_KINDS {
            recompute_kind(pos, color, kind);
        }
        pos.attack_by.recompute_union(color);
    }
}

/// Recompute only the caches a move could have disturbed: the kinds named in `touched`
/// (the moved piece's kind, its promoted-to kind, and the captured piece's kind, each tagged
/// with the color that owns that bitboard) plus every slider kind for both colors, since a
/// slider's ray can pass through a square well away from either its own bitboard or the
/// touched squares.
pub(crate) fn recompute_selective(pos: &mut Position, touched: &[(Color, Piece)]) {
    let mut done = [[false; 6]; 2];
    for &(color, kind) in touched {
        recompute_kind(pos, color, kind);
        done[color.index()][kind.index()] = true;
    }
    for &color in &[Color::White, Color::Black] {
        for &kind in &[Piece::Bishop, Piece::Rook, Piece::Queen] {
            if !done[color.index()][kind.index()] {
                recompute_kind(pos, color, kind);
            }
        }
        pos.attack_by.recompute_union(color);
    }
}
