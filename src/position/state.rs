//! `Position`: the twelve piece bitboards plus the caches and flags that sit on top of them.

use crate::nnue::NnueAccumulator;
use crate::types::{Bitboard, CastlingRights, Color, Piece, Square};
use crate::zobrist;

use super::error::{NnueError, PositionError};

/// Per-color-per-kind attacked-square caches, grouped into one aggregate rather than twelve
/// loose fields (plus the two per-color unions derived from them).
#[derive(Clone, Default)]
pub(crate) struct AttackCaches {
    /// `by_kind[color][piece_kind]`
    pub(crate) by_kind: [[Bitboard; 6]; 2],
    pub(crate) union: [Bitboard; 2],
}

impl AttackCaches {
    pub(crate) fn recompute_union(&mut self, color: Color) {
        let mut u = Bitboard::EMPTY;
        for kind in &self.by_kind[color.index()] {
            u |= *kind;
        }
        self.union[color.index()] = u;
    }
}

/// Pin and check state, recomputed by [`super::Position::set_pins`]/
/// [`super::Position::set_pins_and_checks`] before move generation and cleared by `make`.
#[derive(Clone, Default)]
pub(crate) struct PinState {
    pub(crate) straight_pins: Bitboard,
    pub(crate) diagonal_pins: Bitboard,
    pub(crate) all_pins: Bitboard,
    pub(crate) pawn_checks: Bitboard,
    pub(crate) knight_checks: Bitboard,
    pub(crate) bishop_checks: Bitboard,
    pub(crate) rook_checks: Bitboard,
    pub(crate) queen_checks: Bitboard,
    pub(crate) check_rays: Bitboard,
    pub(crate) num_checks: u8,
    /// Whether pins/checks have been computed since the last `make`/`unmake`.
    pub(crate) valid: bool,
}

impl PinState {
    pub(crate) fn checkers(&self) -> Bitboard {
        self.pawn_checks | self.knight_checks | self.bishop_checks | self.rook_checks | self.queen_checks
    }
}

/// Per-ply undo record. Snapshots everything `make` can mutate so `unmake` can restore it
/// bit-for-bit, including caches that are logically "derived" (attack caches, pins) but must
/// still round-trip exactly per the make/unmake invariant.
#[derive(Clone)]
pub(crate) struct UndoEntry {
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) hash: u64,
    pub(crate) captured: Option<(Color, Piece)>,
    pub(crate) attack_caches: AttackCaches,
    pub(crate) pins: PinState,
}

/// A chess position: bitboards, flags, and the incremental caches layered on top of them.
///
/// Mutated exclusively through [`Position::make`]/[`Position::unmake`]; everything else is a
/// read-only query or a move-generation entry point.
#[derive(Clone)]
pub struct Position {
    /// `piece_bb[color][piece_kind]`
    pub(crate) piece_bb: [[Bitboard; 6]; 2],
    pub(crate) color_bb: [Bitboard; 2],
    pub(crate) all_bb: Bitboard,
    pub(crate) king_square: [Square; 2],
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) ply: usize,
    pub(crate) hash: u64,
    pub(crate) attack_by: AttackCaches,
    pub(crate) pins: PinState,
    pub(crate) repetition: std::collections::HashMap<u64, u32>,
    pub(crate) accumulator: NnueAccumulator,
    pub(crate) undo_stack: Vec<UndoEntry>,
    /// One snapshot per `make`, popped by the matching `unmake`. Simpler than deriving inverse
    /// NNUE deltas for king moves, at the cost of a `Vec<NnueAccumulator>` clone per ply.
    pub(crate) undo_accumulators: Vec<NnueAccumulator>,
    /// `(en_passant, hash)` pairs pushed by `make_null_move`, popped by `unmake_null_move`.
    pub(crate) null_move_undo: Vec<(Option<Square>, u64)>,
}

impl Position {
    /// An empty board: no pieces, white to move, no castling rights.
    #[must_use]
    pub fn empty() -> Self {
        Position {
            piece_bb: [[Bitboard::EMPTY; 6]; 2],
            color_bb: [Bitboard::EMPTY; 2],
            all_bb: Bitboard::EMPTY,
            king_square: [Square::new(0), Square::new(0)],
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            ply: 0,
            hash: 0,
            attack_by: AttackCaches::default(),
            pins: PinState::default(),
            repetition: std::collections::HashMap::new(),
            accumulator: NnueAccumulator::default(),
            undo_stack: Vec::with_capacity(crate::types::MAX_PLY),
            undo_accumulators: Vec::with_capacity(crate::types::MAX_PLY),
            null_move_undo: Vec::new(),
        }
    }

    /// The standard chess starting position.
    #[must_use]
    pub fn starting_position() -> Self {
        super::builder::PositionBuilder::starting_position().build().expect("starting position is valid")
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_square[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.all_bb
    }

    #[inline]
    #[must_use]
    pub fn color_occupied(&self, color: Color) -> Bitboard {
        self.color_bb[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.piece_bb[color.index()][piece.index()]
    }

    /// The piece (if any) occupying `sq`, with its color.
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        if !self.all_bb.contains(sq) {
            return None;
        }
        for &color in &[Color::White, Color::Black] {
            if !self.color_bb[color.index()].contains(sq) {
                continue;
            }
            for (kind_idx, bb) in self.piece_bb[color.index()].iter().enumerate() {
                if bb.contains(sq) {
                    return Some((color, piece_from_index(kind_idx)));
                }
            }
        }
        None
    }

    #[inline]
    #[must_use]
    pub fn is_in_check(&self) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        self.attack_by.union[them.index()].contains(self.king_square[us.index()])
    }

    /// Alias for [`Position::is_in_check`].
    #[inline]
    #[must_use]
    pub fn is_check(&self) -> bool {
        self.is_in_check()
    }

    /// Recompute pin state only (no check detection), for positions known not to be in check.
    /// Move generation calls this internally; exposed publicly so callers that walk pins/checks
    /// outside of `generate_all_legal`/`generate_legal_captures` don't need the crate-private
    /// free functions.
    pub fn set_pins(&mut self) {
        super::pins::set_pins(self);
    }

    /// Recompute both pin state and check state (checkers, check rays, `num_checks`).
    pub fn set_pins_and_checks(&mut self) {
        super::pins::set_pins_and_checks(self);
    }

    /// Evaluate the position through the NNUE accumulator and network, from the side to move's
    /// perspective (a win-probability-like scalar in `[0, 1]`; converting to engine-perspective
    /// for a non-root node, `our_turn ? y : 1.0 - y`, is the search driver's job, not this
    /// crate's). Fails if no real network has been loaded (see [`crate::config::is_initialized`]):
    /// the accumulator itself is always valid, but evaluating through an all-zero placeholder
    /// network would silently return a meaningless constant.
    pub fn evaluate(&self) -> Result<f32, NnueError> {
        if !crate::config::is_initialized() {
            return Err(NnueError::NotInitialized);
        }
        let white_to_move = self.side_to_move == Color::White;
        Ok(self.accumulator.evaluate(white_to_move, crate::config::network()))
    }

    /// Threefold repetition or the 50-move clock.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.halfmove_clock >= 100 || self.repetition.get(&self.hash).copied().unwrap_or(0) >= 3
    }

    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let total_non_king = (0..2)
            .flat_map(|c| (0..5).map(move |k| (c, k)))
            .map(|(c, k)| self.piece_bb[c][k].popcount())
            .sum::<u32>();
        if total_non_king == 0 {
            return true;
        }
        if total_non_king == 1 {
            let only_minor = (0..2).any(|c| {
                self.piece_bb[c][Piece::Knight.index()].popcount() + self.piece_bb[c][Piece::Bishop.index()].popcount() == 1
            });
            return only_minor;
        }
        false
    }

    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.piece_bb[color.index()][piece.index()] |= Bitboard::from_square(sq);
        self.color_bb[color.index()] |= Bitboard::from_square(sq);
        self.all_bb |= Bitboard::from_square(sq);
        if piece == Piece::King {
            self.king_square[color.index()] = sq;
        }
    }

    /// Full rebuild of the Zobrist hash from scratch — used at construction time and by the
    /// test suite to cross-check the incrementally maintained hash.
    #[must_use]
    pub fn rebuild_hash(&self) -> u64 {
        let mut h = 0u64;
        for &color in &[Color::White, Color::Black] {
            for kind_idx in 0..6 {
                let piece = piece_from_index(kind_idx);
                let mut bb = self.piece_bb[color.index()][kind_idx];
                while let Some(sq) = bb.pop_lsb() {
                    h ^= zobrist::piece_key(piece, color, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            h ^= zobrist::side_to_move_key();
        }
        if self.castling_rights.has(Color::White, true) {
            h ^= zobrist::castling_key(Color::White, true);
        }
        if self.castling_rights.has(Color::White, false) {
            h ^= zobrist::castling_key(Color::White, false);
        }
        if self.castling_rights.has(Color::Black, true) {
            h ^= zobrist::castling_key(Color::Black, true);
        }
        if self.castling_rights.has(Color::Black, false) {
            h ^= zobrist::castling_key(Color::Black, false);
        }
        if let Some(ep) = self.en_passant {
            h ^= zobrist::en_passant_key(ep.file());
        }
        h
    }

    /// Validate the structural invariants a freshly constructed position must satisfy.
    pub(crate) fn validate(&self) -> Result<(), PositionError> {
        for &color in &[Color::White, Color::Black] {
            let king_count = self.piece_bb[color.index()][Piece::King.index()].popcount();
            if king_count == 0 {
                return Err(PositionError::MissingKing { color_is_white: color.is_white() });
            }
            if king_count > 1 {
                return Err(PositionError::MultipleKings { color_is_white: color.is_white(), count: king_count });
            }
        }
        let overlap = self.color_bb[0] & self.color_bb[1];
        if !overlap.is_empty() {
            let sq = overlap.lsb().unwrap();
            return Err(PositionError::OverlappingPieces { square: sq.as_index() as u8 });
        }
        for &color in &[Color::White, Color::Black] {
            let pawns = self.piece_bb[color.index()][Piece::Pawn.index()];
            let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
            if pawns.intersects(back_ranks) {
                let sq = (pawns & back_ranks).lsb().unwrap();
                return Err(PositionError::PawnOnBackRank { square: sq.as_index() as u8 });
            }
        }
        Ok(())
    }

    /// Invoked once at construction time, after all pieces are placed: rebuilds the hash,
    /// seeds the repetition table, computes the initial attack caches, and refreshes both
    /// accumulator perspectives from scratch.
    pub(crate) fn finish_construction(&mut self) {
        self.hash = self.rebuild_hash();
        *self.repetition.entry(self.hash).or_insert(0) += 1;
        super::attacks::recompute_all(self);
        super::make_unmake::refresh_both_perspectives(self);
    }
}


#[inline]
pub(crate) const fn piece_from_index(idx: usize) -> Piece {
    match idx {
        0 => Piece::Pawn,
        1 => Piece::Knight,
        2 => Piece::Bishop,
        3 => Piece::Rook,
        4 => Piece::Queen,
        5 => Piece::King,
        _ => unreachable!(),
    }
}
