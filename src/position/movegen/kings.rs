//! King move generation, including castling. The king is never restricted by pins/check masks
//! the way other pieces are — every destination gets its own from-scratch safety check, since
//! the cached attack union was built with the king still on its original square and can't be
//! trusted for squares that were only unsafe *because* the king was blocking a slider's ray.

use crate::tables;
use crate::types::{Color, Move, MoveList, Square};

use super::super::state::Position;
use super::square_attacked_with_occ;

fn king_is_safe_at(pos: &Position, from: Square, to: Square) -> bool {
    let us = pos.side_to_move;
    let them = us.opponent();
    let occ = pos.all_bb.without(from).without(to);
    !square_attacked_with_occ(pos, to, them, occ)
}

pub(super) fn generate(pos: &Position, from: Square, captures_only: bool, moves: &mut MoveList) {
    let us = pos.side_to_move;
    let them = us.opponent();
    let own = pos.color_bb[us.index()];
    let enemy = pos.color_bb[us.opponent().index()];

    let mut targets = tables::king_attacks(from).and(own.not());
    if captures_only {
        targets = targets.and(enemy);
    }
    for to in targets.iter() {
        if king_is_safe_at(pos, from, to) {
            moves.push(if enemy.contains(to) { Move::capture(from, to) } else { Move::quiet(from, to) });
        }
    }

    if captures_only || pos.pins.num_checks > 0 {
        return;
    }

    let back_rank = if us == Color::White { 0u8 } else { 7u8 };
    if from != Square::from_rank_file(back_rank, 4) {
        return;
    }
    let attacked = pos.attack_by.union[them.index()];

    if pos.castling_rights.has(us, true) {
        let f = Square::from_rank_file(back_rank, 5);
        let g = Square::from_rank_file(back_rank, 6);
        let h_rook = Square::from_rank_file(back_rank, 7);
        if !pos.all_bb.contains(f)
            && !pos.all_bb.contains(g)
            && pos.piece_at(h_rook) == Some((us, crate::types::Piece::Rook))
            && !attacked.contains(from)
            && !attacked.contains(f)
            && !attacked.contains(g)
        {
            moves.push(castling_move(us, true));
        }
    }
    if pos.castling_rights.has(us, false) {
        let d = Square::from_rank_file(back_rank, 3);
        let c = Square::from_rank_file(back_rank, 2);
        let b = Square::from_rank_file(back_rank, 1);
        let a_rook = Square::from_rank_file(back_rank, 0);
        if !pos.all_bb.contains(d)
            && !pos.all_bb.contains(c)
            && !pos.all_bb.contains(b)
            && pos.piece_at(a_rook) == Some((us, crate::types::Piece::Rook))
            && !attacked.contains(from)
            && !attacked.contains(d)
            && !attacked.contains(c)
        {
            moves.push(castling_move(us, false));
        }
    }
}

fn castling_move(us: Color, kingside: bool) -> Move {
    match (us, kingside) {
        (Color::White, true) => Move::WHITE_KINGSIDE,
        (Color::White, false) => Move::WHITE_QUEENSIDE,
        (Color::Black, true) => Move::BLACK_KINGSIDE,
        (Color::Black, false) => Move::BLACK_QUEENSIDE,
    }
}
