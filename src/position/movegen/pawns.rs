//! Pawn move generation: single/double pushes, diagonal captures, promotions, and the one
//! piece whose legality needs more than pin/check masking — en passant, which can expose the
//! king along the rank both pawns just vacated (the "en passant pin").

use crate::tables;
use crate::types::{Bitboard, Color, Move, MoveList, Piece, Square};

use super::super::pins::pin_restriction;
use super::super::state::Position;
use super::square_attacked_with_occ;

const PROMOTION_PIECES: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

fn push_with_promotion(moves: &mut MoveList, from: Square, to: Square, is_capture: bool, promotion_rank: u8) {
    if to.rank() == promotion_rank {
        for &p in &PROMOTION_PIECES {
            moves.push(Move::promotion(from, to, p));
        }
    } else if is_capture {
        moves.push(Move::capture(from, to));
    } else {
        moves.push(Move::quiet(from, to));
    }
}

pub(super) fn generate(
    pos: &Position,
    from: Square,
    dest_mask: Bitboard,
    captures_only: bool,
    moves: &mut MoveList,
) {
    let us = pos.side_to_move;
    let them = us.opponent();
    let white = us == Color::White;
    let promotion_rank = if white { 7 } else { 0 };
    let start_rank = if white { 1 } else { 6 };

    let mut allowed = dest_mask;
    if let Some(pin_line) = pin_restriction(pos, from) {
        allowed = allowed.and(pin_line);
    }

    if let Some(one_forward) = from.forward(white) {
        if !pos.all_bb.contains(one_forward) {
            if !captures_only && allowed.contains(one_forward) {
                push_with_promotion(moves, from, one_forward, false, promotion_rank);
            }
            if from.rank() == start_rank {
                if let Some(two_forward) = one_forward.forward(white) {
                    if !pos.all_bb.contains(two_forward) && !captures_only && allowed.contains(two_forward) {
                        moves.push(Move::double_pawn_push(from, two_forward));
                    }
                }
            }
        }
    }

    let attack_targets = match us {
        Color::White => tables::white_pawn_attacks(from),
        Color::Black => tables::black_pawn_attacks(from),
    };
    for to in attack_targets.iter() {
        if let Some((color, _)) = pos.piece_at(to) {
            if color == them && allowed.contains(to) {
                push_with_promotion(moves, from, to, true, promotion_rank);
            }
        } else if Some(to) == pos.en_passant && allowed_en_passant(pos, from, to) {
            moves.push(Move::capture(from, to));
        }
    }
}

/// En passant is legal under pin/check restriction if capturing it removes the checking piece
/// or blocks the check ray, AND it doesn't expose the king to a rank-aligned slider once both
/// pawns are lifted off the board (the capturing pawn's origin and the captured pawn's square).
fn allowed_en_passant(pos: &Position, from: Square, to: Square) -> bool {
    let us = pos.side_to_move;
    let them = us.opponent();
    let captured_sq = Square::from_rank_file(from.rank(), to.file());

    let check_mask = super::check_response_mask(pos);
    if !check_mask.contains(to) && !check_mask.contains(captured_sq) {
        return false;
    }

    let king = pos.king_square[us.index()];
    let occ_after = pos.all_bb.without(from).without(captured_sq).with(to);
    !square_attacked_with_occ(pos, king, them, occ_after)
}
