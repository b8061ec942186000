//! `make`/`unmake`, the null-move pair, and the NNUE accumulator wiring that rides along with
//! them. This is the only place `Position`'s bitboards are ever mutated.

use crate::nnue::sub_feature_index;
use crate::types::{Bitboard, Color, Move, Piece, Square, MAX_PLY};
use crate::zobrist;

use super::state::{AttackCaches, PinState, Position, UndoEntry};

fn rook_castle_squares(color: Color, kingside: bool) -> (Square, Square) {
    match (color, kingside) {
        (Color::White, true) => (Square::new(7), Square::new(5)),   // h1 -> f1
        (Color::White, false) => (Square::new(0), Square::new(3)),  // a1 -> d1
        (Color::Black, true) => (Square::new(63), Square::new(61)), // h8 -> f8
        (Color::Black, false) => (Square::new(56), Square::new(59)), // a8 -> d8
    }
}

fn castling_move_for(us: Color, mv: Move) -> Option<bool> {
    match (us, mv) {
        (Color::White, Move::WHITE_KINGSIDE) => Some(true),
        (Color::White, Move::WHITE_QUEENSIDE) => Some(false),
        (Color::Black, Move::BLACK_KINGSIDE) => Some(true),
        (Color::Black, Move::BLACK_QUEENSIDE) => Some(false),
        _ => None,
    }
}

/// One add/remove NNUE feature event generated by a single `make`. Kings never appear here —
/// a king move is handled separately via a whole-perspective refresh.
struct FeatureEvent {
    add: bool,
    piece: Piece,
    color: Color,
    square: Square,
}

fn active_pieces(pos: &Position) -> Vec<(Piece, Color, Square)> {
    let mut out = Vec::with_capacity(32);
    for &color in &[Color::White, Color::Black] {
        for &kind in &[Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            for sq in pos.piece_bb[color.index()][kind.index()].iter() {
                out.push((kind, color, sq));
            }
        }
    }
    out
}

/// Refresh both perspectives from scratch. Used once at construction time.
pub(crate) fn refresh_both_perspectives(pos: &mut Position) {
    let net = crate::config::network();
    let pieces = active_pieces(pos);
    pos.accumulator.refresh(Color::White, pos.king_square[Color::White.index()], pieces.clone(), net);
    pos.accumulator.refresh(Color::Black, pos.king_square[Color::Black.index()], pieces, net);
}

fn apply_feature_events(pos: &mut Position, events: &[FeatureEvent], skip: Option<Color>) {
    let net = crate::config::network();
    for &perspective in &[Color::White, Color::Black] {
        if Some(perspective) == skip {
            continue;
        }
        let king_sq = pos.king_square[perspective.index()];
        for ev in events {
            let sub = sub_feature_index(ev.piece, ev.color, ev.square, perspective);
            if ev.add {
                pos.accumulator.add_feature(perspective, king_sq, sub, net);
            } else {
                pos.accumulator.remove_feature(perspective, king_sq, sub, net);
            }
        }
    }
}

impl Position {
    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.piece_bb[color.index()][piece.index()] &= !bit;
        self.color_bb[color.index()] &= !bit;
        self.all_bb &= !bit;
    }

    /// Apply `mv` to the position, pushing an undo record for the matching `unmake`.
    ///
    /// # Panics
    ///
    /// Panics if the undo stack is already at its `MAX_PLY` capacity. Exceeding the deepest
    /// ply a search is ever expected to reach is a programming error (spec §5/§7/§8), not a
    /// condition this crate recovers from.
    pub fn make(&mut self, mv: Move) {
        assert!(
            self.ply < MAX_PLY,
            "make: ply {} would exceed the undo stack capacity of {MAX_PLY}",
            self.ply
        );

        let prev_castling = self.castling_rights;
        let prev_ep = self.en_passant;
        let prev_halfmove = self.halfmove_clock;
        let prev_hash = self.hash;
        let prev_attack_caches = self.attack_by.clone();
        let prev_pins = self.pins.clone();

        let us = self.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();

        let mut hash = self.hash;
        if let Some(ep) = self.en_passant {
            hash ^= zobrist::en_passant_key(ep.file());
        }

        let mut events: Vec<FeatureEvent> = Vec::with_capacity(4);
        let mut touched: Vec<(Color, Piece)> = Vec::with_capacity(4);
        let mut captured: Option<(Color, Piece)> = None;

        let castling_side = castling_move_for(us, mv);

        let (_, moving_piece) =
            self.piece_at(from).unwrap_or_else(|| panic!("make: no piece on origin square {from}"));

        // En-passant capture: destination is the ep target, mover is a pawn, destination empty.
        let is_en_passant = moving_piece == Piece::Pawn && Some(to) == prev_ep && !self.all_bb.contains(to);

        if is_en_passant {
            let captured_sq = Square::from_rank_file(from.rank(), to.file());
            self.remove_piece(captured_sq, them, Piece::Pawn);
            hash ^= zobrist::piece_key(Piece::Pawn, them, captured_sq);
            events.push(FeatureEvent { add: false, piece: Piece::Pawn, color: them, square: captured_sq });
            captured = Some((them, Piece::Pawn));
            touched.push((them, Piece::Pawn));
        } else if let Some((cap_color, cap_piece)) = self.piece_at(to) {
            self.remove_piece(to, cap_color, cap_piece);
            hash ^= zobrist::piece_key(cap_piece, cap_color, to);
            if cap_piece != Piece::King {
                events.push(FeatureEvent { add: false, piece: cap_piece, color: cap_color, square: to });
            }
            captured = Some((cap_color, cap_piece));
            touched.push((cap_color, cap_piece));
        }

        // Castling rights: corner squares and king moves.
        let mut new_castling = prev_castling;
        for &(corner, color, kingside) in &[
            (Square::new(0), Color::White, false),
            (Square::new(7), Color::White, true),
            (Square::new(56), Color::Black, false),
            (Square::new(63), Color::Black, true),
        ] {
            if from == corner || to == corner {
                new_castling.clear(color, kingside);
            }
        }
        if moving_piece == Piece::King {
            new_castling.clear_color(us);
        }
        for &color in &[Color::White, Color::Black] {
            for &kingside in &[true, false] {
                if prev_castling.has(color, kingside) != new_castling.has(color, kingside) {
                    hash ^= zobrist::castling_key(color, kingside);
                }
            }
        }
        self.castling_rights = new_castling;

        // Move the piece itself (or, for promotions, replace it).
        self.remove_piece(from, us, moving_piece);
        hash ^= zobrist::piece_key(moving_piece, us, from);
        let final_piece = if let Some(promo) = mv.promotion_piece() { promo } else { moving_piece };
        self.set_piece(to, us, final_piece);
        hash ^= zobrist::piece_key(final_piece, us, to);

        if moving_piece != Piece::King {
            events.push(FeatureEvent { add: false, piece: moving_piece, color: us, square: from });
            events.push(FeatureEvent { add: true, piece: final_piece, color: us, square: to });
        }
        touched.push((us, moving_piece));
        if final_piece != moving_piece {
            touched.push((us, final_piece));
        }

        // Castling: also relocate the rook.
        if let Some(kingside) = castling_side {
            let (rook_from, rook_to) = rook_castle_squares(us, kingside);
            self.remove_piece(rook_from, us, Piece::Rook);
            hash ^= zobrist::piece_key(Piece::Rook, us, rook_from);
            self.set_piece(rook_to, us, Piece::Rook);
            hash ^= zobrist::piece_key(Piece::Rook, us, rook_to);
            events.push(FeatureEvent { add: false, piece: Piece::Rook, color: us, square: rook_from });
            events.push(FeatureEvent { add: true, piece: Piece::Rook, color: us, square: rook_to });
            touched.push((us, Piece::Rook));
        }

        // New en-passant target.
        let new_ep = if moving_piece == Piece::Pawn && from.rank_distance(to) == 2 {
            let mid_rank = (from.rank() + to.rank()) / 2;
            Some(Square::from_rank_file(mid_rank, from.file()))
        } else {
            None
        };
        if let Some(ep) = new_ep {
            hash ^= zobrist::en_passant_key(ep.file());
        }
        self.en_passant = new_ep;

        hash ^= zobrist::side_to_move_key();
        self.hash = hash;

        self.halfmove_clock =
            if moving_piece == Piece::Pawn || captured.is_some() { 0 } else { self.halfmove_clock + 1 };

        // NNUE: king moves refresh that perspective wholesale; everything else is a delta.
        if moving_piece == Piece::King {
            // The mover's own perspective is indexed by its own king square, which just moved;
            // every feature row for it is now stale, so refresh wholesale instead of patching.
            apply_feature_events(self, &events, Some(us));
            let net = crate::config::network();
            let pieces = active_pieces(self);
            self.accumulator.refresh(us, self.king_square[us.index()], pieces, net);
        } else {
            apply_feature_events(self, &events, None);
        }

        self.side_to_move = them;
        self.pins = PinState::default();
        super::attacks::recompute_selective(self, &touched);
        self.ply += 1;
        *self.repetition.entry(self.hash).or_insert(0) += 1;

        self.undo_stack.push(UndoEntry {
            castling_rights: prev_castling,
            en_passant: prev_ep,
            halfmove_clock: prev_halfmove,
            hash: prev_hash,
            captured,
            attack_caches: prev_attack_caches,
            pins: prev_pins,
        });
        self.undo_accumulators.push(self.accumulator.clone());
    }

    /// Undo the most recent `make`, restoring the position to its pre-move state exactly.
    pub fn unmake(&mut self, mv: Move) {
        let entry = self.undo_stack.pop().expect("unmake called with an empty undo stack");
        let prev_accumulator =
            self.undo_accumulators.pop().expect("unmake: accumulator undo stack out of sync");

        if let Some(count) = self.repetition.get_mut(&self.hash) {
            *count -= 1;
            if *count == 0 {
                self.repetition.remove(&self.hash);
            }
        }
        self.ply -= 1;

        let them = self.side_to_move;
        let us = them.opponent();
        self.side_to_move = us;

        let from = mv.from();
        let to = mv.to();
        let castling_side = castling_move_for(us, mv);

        if let Some(kingside) = castling_side {
            let (rook_from, rook_to) = rook_castle_squares(us, kingside);
            self.remove_piece(rook_to, us, Piece::Rook);
            self.set_piece(rook_from, us, Piece::Rook);
        }

        let moved_piece = if let Some(promo) = mv.promotion_piece() {
            self.remove_piece(to, us, promo);
            Piece::Pawn
        } else {
            let (_, piece) = self.piece_at(to).expect("unmake: destination square unexpectedly empty");
            self.remove_piece(to, us, piece);
            piece
        };
        self.set_piece(from, us, moved_piece);

        if let Some((cap_color, cap_piece)) = entry.captured {
            let is_en_passant = moved_piece == Piece::Pawn && Some(to) == entry.en_passant && cap_color == them;
            let capture_sq =
                if is_en_passant { Square::from_rank_file(from.rank(), to.file()) } else { to };
            self.set_piece(capture_sq, cap_color, cap_piece);
        }

        self.castling_rights = entry.castling_rights;
        self.en_passant = entry.en_passant;
        self.halfmove_clock = entry.halfmove_clock;
        self.hash = entry.hash;
        self.attack_by = entry.attack_caches;
        self.pins = entry.pins;
        self.accumulator = prev_accumulator;
    }

    /// Toggle side to move and the ep target/hash only, leaving every piece untouched. Used by
    /// null-move pruning in the search driver this core feeds.
    pub fn make_null_move(&mut self) {
        let prev_ep = self.en_passant;
        let prev_hash = self.hash;
        let mut hash = self.hash;
        if let Some(ep) = self.en_passant {
            hash ^= zobrist::en_passant_key(ep.file());
        }
        hash ^= zobrist::side_to_move_key();
        self.en_passant = None;
        self.hash = hash;
        self.side_to_move = self.side_to_move.opponent();
        self.pins = PinState::default();
        self.ply += 1;
        self.null_move_undo.push((prev_ep, prev_hash));
    }

    pub fn unmake_null_move(&mut self) {
        let (prev_ep, prev_hash) =
            self.null_move_undo.pop().expect("unmake_null_move called with no matching make_null_move");
        self.ply -= 1;
        self.side_to_move = self.side_to_move.opponent();
        self.en_passant = prev_ep;
        self.hash = prev_hash;
        self.pins = PinState::default();
    }
}
