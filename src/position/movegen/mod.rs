//! Legal move generation.
//!
//! Unlike a generate-then-filter pseudo-legal generator, every move pushed here is already
//! known legal: pins restrict a piece's destinations to its pin line, check restricts every
//! non-king destination to the check-blocking/capturing squares, and the king gets a
//! from-scratch safety test per destination rather than relying on the (possibly stale, once
//! the king itself moves) cached attack union. See `oracle` (test-only) for a naive
//! generate-then-filter cross-check used by the perft tests.

mod kings;
mod knights;
mod pawns;
mod sliders;

#[cfg(test)]
pub(crate) mod oracle;

use crate::magic;
use crate::tables;
use crate::types::{Bitboard, Color, Move, MoveList, Piece, ScoredMoveList, Square};

use super::pins;
use super::state::Position;

/// Squares from which a pawn/knight/bishop/rook/queen/king of `attacker`'s color would attack
/// `sq`, evaluated against a caller-supplied occupancy rather than the position's live cache.
/// Used for king-move safety (the occupancy with the king's own square removed) and the en
/// passant pin check (the occupancy with both pawns lifted).
pub(super) fn square_attacked_with_occ(pos: &Position, sq: Square, attacker: Color, occ: Bitboard) -> bool {
    let pawn_origin = match attacker {
        Color::White => tables::black_pawn_attacks(sq),
        Color::Black => tables::white_pawn_attacks(sq),
    };
    if pawn_origin.intersects(pos.pieces(attacker, Piece::Pawn)) {
        return true;
    }
    if tables::knight_attacks(sq).intersects(pos.pieces(attacker, Piece::Knight)) {
        return true;
    }
    if tables::king_attacks(sq).intersects(pos.pieces(attacker, Piece::King)) {
        return true;
    }
    let bishop_like = pos.pieces(attacker, Piece::Bishop) | pos.pieces(attacker, Piece::Queen);
    if bishop_like.intersects(magic::bishop_attacks(sq, occ.and(tables::bishop_ray_mask(sq)))) {
        return true;
    }
    let rook_like = pos.pieces(attacker, Piece::Rook) | pos.pieces(attacker, Piece::Queen);
    if rook_like.intersects(magic::rook_attacks(sq, occ.and(tables::rook_ray_mask(sq)))) {
        return true;
    }
    false
}

/// The set of squares a non-king piece may move to: unrestricted when not in check, the
/// check-blocking ray plus the checker's own square under single check, and nothing at all
/// under double check (only the king can respond).
pub(super) fn check_response_mask(pos: &Position) -> Bitboard {
    match pos.pins.num_checks {
        0 => Bitboard::ALL,
        1 => pos.pins.check_rays | pos.pins.checkers(),
        _ => Bitboard::EMPTY,
    }
}

fn generate(pos: &mut Position, captures_only: bool) -> MoveList {
    if pos.is_in_check() {
        pins::set_pins_and_checks(pos);
    } else {
        pins::set_pins(pos);
    }

    let mut moves = MoveList::new();
    let us = pos.side_to_move;

    for from in pos.pieces(us, Piece::King).iter() {
        kings::generate(pos, from, captures_only, &mut moves);
    }

    if pos.pins.num_checks >= 2 {
        return moves;
    }

    let dest_mask = check_response_mask(pos);

    for from in pos.pieces(us, Piece::Pawn).iter() {
        pawns::generate(pos, from, dest_mask, captures_only, &mut moves);
    }
    for from in pos.pieces(us, Piece::Knight).iter() {
        knights::generate(pos, from, dest_mask, captures_only, &mut moves);
    }
    for &kind in &[Piece::Bishop, Piece::Rook, Piece::Queen] {
        for from in pos.pieces(us, kind).iter() {
            sliders::generate(pos, from, kind, dest_mask, captures_only, &mut moves);
        }
    }

    moves
}

fn victim_rank(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight => 2,
        Piece::Bishop => 3,
        Piece::Rook => 4,
        Piece::Queen => 5,
        Piece::King => 100,
    }
}

impl Position {
    /// Every legal move available to the side to move.
    #[must_use]
    pub fn generate_all_legal(&mut self) -> MoveList {
        generate(self, false)
    }

    /// Every legal capture (including en passant and capturing promotions) available to the
    /// side to move. Used by quiescence search.
    #[must_use]
    pub fn generate_legal_captures(&mut self) -> MoveList {
        generate(self, true)
    }

    /// `true` iff the side to move has no legal moves.
    #[must_use]
    pub fn has_no_legal_moves(&mut self) -> bool {
        self.generate_all_legal().is_empty()
    }

    /// Checkmate: in check with no legal response.
    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        self.is_in_check() && self.has_no_legal_moves()
    }

    /// Stalemate: not in check, but no legal move either.
    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        !self.is_in_check() && self.has_no_legal_moves()
    }

    /// Score every move in `moves` for move ordering: the transposition-table hint first (if
    /// present among them), then captures ordered by victim value, then a small set of
    /// unsafe-destination penalties for non-capturing piece moves onto squares the opponent's
    /// pawns/minors already attack.
    #[must_use]
    pub fn order_all(&self, moves: &MoveList, tt_hint: Option<Move>) -> ScoredMoveList {
        let us = self.side_to_move;
        let them = us.opponent();
        let enemy_pawn_attacks = self.attack_by.by_kind[them.index()][Piece::Pawn.index()];
        let enemy_minor_attacks = enemy_pawn_attacks
            | self.attack_by.by_kind[them.index()][Piece::Knight.index()]
            | self.attack_by.by_kind[them.index()][Piece::Bishop.index()];
        let enemy_rook_attacks = enemy_minor_attacks | self.attack_by.by_kind[them.index()][Piece::Rook.index()];

        let mut scored = ScoredMoveList::new();
        for &mv in moves.iter() {
            let score = if Some(mv) == tt_hint {
                63
            } else if let Some((_, captured)) = self.piece_at(mv.to()) {
                victim_rank(captured)
            } else if let Some((_, mover)) = self.piece_at(mv.from()) {
                match mover {
                    Piece::Knight | Piece::Bishop if enemy_pawn_attacks.contains(mv.to()) => -2,
                    Piece::Rook if enemy_minor_attacks.contains(mv.to()) => -3,
                    Piece::Queen if enemy_rook_attacks.contains(mv.to()) => -3,
                    _ => 0,
                }
            } else {
                0
            };
            scored.push(mv, score);
        }
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::from_fen;

    fn legal_sorted(pos: &mut Position) -> Vec<Move> {
        let mut moves: Vec<Move> = pos.generate_all_legal().iter().copied().collect();
        moves.sort_by_key(|m| (m.from().as_index(), m.to().as_index(), m.promotion_piece().map(|p| p.index())));
        moves
    }

    fn oracle_sorted(pos: &Position) -> Vec<Move> {
        let mut moves: Vec<Move> = oracle::generate_legal(pos).iter().copied().collect();
        moves.sort_by_key(|m| (m.from().as_index(), m.to().as_index(), m.promotion_piece().map(|p| p.index())));
        moves
    }

    fn assert_matches_oracle(fen: &str) {
        let mut pos = from_fen(fen).expect("valid fen");
        let generated = legal_sorted(&mut pos);
        let from_oracle = oracle_sorted(&pos);
        assert_eq!(generated, from_oracle, "generator disagrees with oracle for {fen}");
        let unique: std::collections::HashSet<_> = generated.iter().collect();
        assert_eq!(unique.len(), generated.len(), "duplicate legal move for {fen}");
    }

    #[test]
    fn agrees_with_oracle_on_starting_position() {
        assert_matches_oracle("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    }

    #[test]
    fn agrees_with_oracle_on_kiwipete() {
        assert_matches_oracle("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    }

    #[test]
    fn agrees_with_oracle_across_a_random_walk() {
        use rand::prelude::*;

        let mut pos = Position::starting_position();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..40 {
            let from_oracle = oracle_sorted(&pos);
            let generated = legal_sorted(&mut pos);
            assert_eq!(generated, from_oracle);

            let moves = pos.generate_all_legal();
            if moves.is_empty() {
                break;
            }
            let mv = moves.get(rng.gen_range(0..moves.len())).unwrap();
            pos.make(mv);
        }
    }

    #[test]
    fn king_adjacent_to_enemy_king_only_legal_moves_are_kings() {
        // 3k4/3P4/3K4/8/8/8/8/8 w - - 0 1: white king and pawn, black king blocks promotion.
        // d6 king reaches c5, c6, d5, e5, e6 (c7/e7 adjacent to the black king on d8 are
        // denied, d7 is blocked by the own pawn) — 5 legal king moves, no pawn promotion.
        let mut pos = from_fen("3k4/3P4/3K4/8/8/8/8/8 w - - 0 1").expect("valid fen");
        let moves = pos.generate_all_legal();
        assert_eq!(moves.len(), 5);
        for mv in moves.iter() {
            assert_eq!(pos.piece_at(mv.from()), Some((crate::types::Color::White, Piece::King)));
        }
    }

    #[test]
    fn en_passant_capture_exposing_king_to_rook_is_excluded() {
        let mut pos = from_fen("8/8/8/K2Pp2r/8/8/8/8 w - e6 0 1").expect("valid fen");
        let moves = pos.generate_all_legal();
        assert_eq!(moves.len(), 7);
        let d5 = Square::new(35);
        let e6 = Square::new(44);
        assert!(!moves.iter().any(|m| m.from() == d5 && m.to() == e6));
    }

    #[test]
    fn castling_blocked_when_passed_square_is_attacked() {
        let mut both_sides = from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid fen");
        let moves = both_sides.generate_all_legal();
        let king_moves = moves.iter().filter(|m| {
            both_sides.piece_at(m.from()) == Some((crate::types::Color::White, Piece::King))
        }).count();
        assert_eq!(king_moves, 5);

        let mut f1_attacked =
            from_fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1").expect("valid fen");
        let moves = f1_attacked.generate_all_legal();
        assert!(!moves.iter().any(|m| *m == Move::WHITE_KINGSIDE));
    }

    #[test]
    fn promotion_emits_all_four_piece_variants() {
        let mut pos = from_fen("4k3/6P1/8/8/8/8/8/4K3 w - - 0 1").expect("valid fen");
        let moves = pos.generate_all_legal();
        let g7 = Square::new(54);
        let g8 = Square::new(62);
        let promos: Vec<_> = moves
            .iter()
            .filter(|m| m.from() == g7 && m.to() == g8)
            .map(|m| m.promotion_piece().unwrap())
            .collect();
        assert_eq!(promos.len(), 4);
        for p in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
            assert!(promos.contains(&p));
        }
    }

    #[test]
    fn double_check_restricts_generation_to_king_moves() {
        let mut pos = from_fen("8/8/8/8/3k4/8/3K4/3R1B2 b - - 0 1").expect("valid fen");
        assert!(pos.is_check());
        let moves = pos.generate_all_legal();
        assert!(!moves.is_empty());
        for mv in moves.iter() {
            assert_eq!(pos.piece_at(mv.from()), Some((crate::types::Color::Black, Piece::King)));
        }
    }
}
