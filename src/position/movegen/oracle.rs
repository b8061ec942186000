//! Naive generate-then-filter legal move generator, used only as a perft cross-check oracle
//! for the legal-at-generation-time generator in the rest of this module. Slower, but
//! structurally distinct enough that agreement between the two is a strong legality signal.

use crate::types::{Bitboard, Color, Move, MoveList, Piece, Square};

use super::super::state::Position;

fn pseudo_legal_destinations(pos: &Position, from: Square, piece: Piece) -> Bitboard {
    let us = pos.side_to_move;
    let own = pos.color_bb[us.index()];
    match piece {
        Piece::Pawn => Bitboard::EMPTY, // handled separately below
        Piece::Knight => crate::tables::knight_attacks(from).and(own.not()),
        Piece::King => crate::tables::king_attacks(from).and(own.not()),
        Piece::Bishop | Piece::Rook | Piece::Queen => {
            super::sliders::slider_attacks(pos, from, piece).and(own.not())
        }
    }
}

fn push_pawn_pseudo_moves(pos: &Position, from: Square, moves: &mut MoveList) {
    let us = pos.side_to_move;
    let white = us == Color::White;
    let promotion_rank = if white { 7 } else { 0 };
    let start_rank = if white { 1 } else { 6 };

    if let Some(one) = from.forward(white) {
        if !pos.all_bb.contains(one) {
            push_with_promo(moves, from, one, promotion_rank);
            if from.rank() == start_rank {
                if let Some(two) = one.forward(white) {
                    if !pos.all_bb.contains(two) {
                        moves.push(Move::double_pawn_push(from, two));
                    }
                }
            }
        }
    }

    let attacks = match us {
        Color::White => crate::tables::white_pawn_attacks(from),
        Color::Black => crate::tables::black_pawn_attacks(from),
    };
    for to in attacks.iter() {
        if let Some((color, _)) = pos.piece_at(to) {
            if color != us {
                push_with_promo(moves, from, to, promotion_rank);
            }
        } else if Some(to) == pos.en_passant {
            moves.push(Move::capture(from, to));
        }
    }
}

fn push_with_promo(moves: &mut MoveList, from: Square, to: Square, promotion_rank: u8) {
    if to.rank() == promotion_rank {
        for &p in &[Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
            moves.push(Move::promotion(from, to, p));
        }
    } else {
        moves.push(Move::quiet(from, to));
    }
}

fn generate_pseudo_legal(pos: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let us = pos.side_to_move;

    for from in pos.pieces(us, Piece::Pawn).iter() {
        push_pawn_pseudo_moves(pos, from, &mut moves);
    }
    for &kind in &[Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
        for from in pos.pieces(us, kind).iter() {
            for to in pseudo_legal_destinations(pos, from, kind).iter() {
                moves.push(Move::quiet(from, to));
            }
        }
    }

    let back_rank = if us == Color::White { 0u8 } else { 7u8 };
    let king_home = Square::from_rank_file(back_rank, 4);
    if pos.piece_at(king_home) == Some((us, Piece::King)) {
        if pos.castling_rights.has(us, true)
            && !pos.all_bb.contains(Square::from_rank_file(back_rank, 5))
            && !pos.all_bb.contains(Square::from_rank_file(back_rank, 6))
        {
            moves.push(match us {
                Color::White => Move::WHITE_KINGSIDE,
                Color::Black => Move::BLACK_KINGSIDE,
            });
        }
        if pos.castling_rights.has(us, false)
            && !pos.all_bb.contains(Square::from_rank_file(back_rank, 1))
            && !pos.all_bb.contains(Square::from_rank_file(back_rank, 2))
            && !pos.all_bb.contains(Square::from_rank_file(back_rank, 3))
        {
            moves.push(match us {
                Color::White => Move::WHITE_QUEENSIDE,
                Color::Black => Move::BLACK_QUEENSIDE,
            });
        }
    }

    moves
}

/// Generate-then-filter legal moves: every pseudo-legal move is made on a scratch clone and
/// kept only if it doesn't leave (or pass the king through, for castling) check.
#[must_use]
pub(crate) fn generate_legal(pos: &Position) -> MoveList {
    let us = pos.side_to_move;
    let them = us.opponent();
    let mut legal = MoveList::new();

    for mv in generate_pseudo_legal(pos).iter() {
        if mv.is_castling() {
            let from = mv.from();
            let mid = Square::from_rank_file(from.rank(), (from.file() + mv.to().file()) / 2);
            if super::square_attacked_with_occ(pos, from, them, pos.all_bb)
                || super::square_attacked_with_occ(pos, mid, them, pos.all_bb)
                || super::square_attacked_with_occ(pos, mv.to(), them, pos.all_bb)
            {
                continue;
            }
        }
        let mut trial = pos.clone();
        trial.make(*mv);
        let king_safe = !trial.attack_by.union[them.index()].contains(trial.king_square(us));
        if king_safe {
            legal.push(*mv);
        }
    }
    legal
}
