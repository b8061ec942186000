//! Bishop, rook, and queen move generation, all routed through the magic attack tables.

use crate::magic;
use crate::tables;
use crate::types::{Bitboard, Move, MoveList, Piece, Square};

use super::super::pins::pin_restriction;
use super::super::state::Position;

pub(super) fn slider_attacks(pos: &Position, from: Square, kind: Piece) -> Bitboard {
    match kind {
        Piece::Bishop => magic::bishop_attacks(from, pos.all_bb.and(tables::bishop_ray_mask(from))),
        Piece::Rook => magic::rook_attacks(from, pos.all_bb.and(tables::rook_ray_mask(from))),
        Piece::Queen => magic::queen_attacks(
            from,
            pos.all_bb.and(tables::rook_ray_mask(from)),
            pos.all_bb.and(tables::bishop_ray_mask(from)),
        ),
        _ => unreachable!("slider_attacks called for a non-slider piece"),
    }
}

pub(super) fn generate(
    pos: &Position,
    from: Square,
    kind: Piece,
    dest_mask: Bitboard,
    captures_only: bool,
    moves: &mut MoveList,
) {
    let us = pos.side_to_move;
    let own = pos.color_bb[us.index()];
    let enemy = pos.color_bb[us.opponent().index()];

    let mut allowed = dest_mask;
    if let Some(pin_line) = pin_restriction(pos, from) {
        allowed = allowed.and(pin_line);
    }

    let mut targets = slider_attacks(pos, from, kind).and(allowed).and(own.not());
    if captures_only {
        targets = targets.and(enemy);
    }
    for to in targets.iter() {
        moves.push(if enemy.contains(to) { Move::capture(from, to) } else { Move::quiet(from, to) });
    }
}
