//! Fluent builder for constructing positions piece by piece, rather than through FEN text.
//!
//! ```
//! use position_core::position::Position;
//! use position_core::position::builder::PositionBuilder;
//! use position_core::types::{Color, Piece, Square};
//!
//! let pos = PositionBuilder::new()
//!     .piece(Square::new(4), Color::White, Piece::King)
//!     .piece(Square::new(60), Color::Black, Piece::King)
//!     .piece(Square::new(8), Color::White, Piece::Pawn)
//!     .side_to_move(Color::White)
//!     .build()
//!     .unwrap();
//! assert_eq!(pos.side_to_move(), Color::White);
//! ```

use crate::types::{CastlingRights, Color, Piece, Square};

use super::error::PositionError;
use super::state::Position;

/// A fluent builder for [`Position`].
#[derive(Clone, Debug)]
pub struct PositionBuilder {
    pieces: Vec<(Square, Color, Piece)>,
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_target: Option<Square>,
    halfmove_clock: u32,
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionBuilder {
    #[must_use]
    pub fn new() -> Self {
        PositionBuilder {
            pieces: Vec::new(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
        }
    }

    /// A builder pre-populated with the standard initial position and full castling rights.
    #[must_use]
    pub fn starting_position() -> Self {
        let mut builder = Self::new();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, &piece) in back_rank.iter().enumerate() {
            builder.pieces.push((Square::from_rank_file(0, file as u8), Color::White, piece));
            builder.pieces.push((Square::from_rank_file(7, file as u8), Color::Black, piece));
        }
        for file in 0..8u8 {
            builder.pieces.push((Square::from_rank_file(1, file), Color::White, Piece::Pawn));
            builder.pieces.push((Square::from_rank_file(6, file), Color::Black, Piece::Pawn));
        }
        builder.castling_rights = CastlingRights::all();
        builder
    }

    #[must_use]
    pub fn piece(mut self, square: Square, color: Color, piece: Piece) -> Self {
        self.pieces.retain(|(sq, _, _)| *sq != square);
        self.pieces.push((square, color, piece));
        self
    }

    #[must_use]
    pub fn clear(mut self, square: Square) -> Self {
        self.pieces.retain(|(sq, _, _)| *sq != square);
        self
    }

    #[must_use]
    pub const fn side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    #[must_use]
    pub const fn castling(mut self, rights: CastlingRights) -> Self {
        self.castling_rights = rights;
        self
    }

    #[must_use]
    pub fn castle_kingside(mut self, color: Color) -> Self {
        self.castling_rights.set(color, true);
        self
    }

    #[must_use]
    pub fn castle_queenside(mut self, color: Color) -> Self {
        self.castling_rights.set(color, false);
        self
    }

    #[must_use]
    pub const fn all_castling_rights(mut self) -> Self {
        self.castling_rights = CastlingRights::all();
        self
    }

    #[must_use]
    pub const fn no_castling_rights(mut self) -> Self {
        self.castling_rights = CastlingRights::none();
        self
    }

    #[must_use]
    pub const fn en_passant(mut self, target: Square) -> Self {
        self.en_passant_target = Some(target);
        self
    }

    #[must_use]
    pub const fn clear_en_passant(mut self) -> Self {
        self.en_passant_target = None;
        self
    }

    #[must_use]
    pub const fn halfmove_clock(mut self, clock: u32) -> Self {
        self.halfmove_clock = clock;
        self
    }

    /// Build the position, validating the structural invariants ([`PositionError`]) and then
    /// computing every derived cache (hash, attack tables, NNUE accumulators).
    pub fn build(self) -> Result<Position, PositionError> {
        let mut pos = Position::empty();
        for (square, color, piece) in self.pieces {
            pos.set_piece(square, color, piece);
        }
        pos.side_to_move = self.side_to_move;
        pos.castling_rights = self.castling_rights;
        pos.en_passant = self.en_passant_target;
        pos.halfmove_clock = self.halfmove_clock;
        pos.validate()?;
        pos.finish_construction();
        Ok(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_matches_dedicated_constructor() {
        let built = PositionBuilder::starting_position().build().unwrap();
        let standard = Position::starting_position();
        assert_eq!(built.hash(), standard.hash());
    }

    #[test]
    fn empty_board_with_two_kings_is_valid() {
        let pos = PositionBuilder::new()
            .piece(Square::new(4), Color::White, Piece::King)
            .piece(Square::new(60), Color::Black, Piece::King)
            .build()
            .unwrap();
        assert!(pos.piece_at(Square::new(4)).is_some());
        assert!(pos.piece_at(Square::new(0)).is_none());
    }

    #[test]
    fn missing_king_is_rejected() {
        let err = PositionBuilder::new().piece(Square::new(60), Color::Black, Piece::King).build();
        assert!(err.is_err());
    }

    #[test]
    fn castling_rights_accumulate() {
        let pos = PositionBuilder::starting_position()
            .no_castling_rights()
            .castle_kingside(Color::White)
            .build()
            .unwrap();
        let rights = pos.castling_rights();
        assert!(rights.has(Color::White, true));
        assert!(!rights.has(Color::White, false));
        assert!(!rights.has(Color::Black, true));
    }

    #[test]
    fn clear_removes_a_placed_piece() {
        let pos = PositionBuilder::starting_position().clear(Square::new(0)).build().unwrap();
        assert!(pos.piece_at(Square::new(0)).is_none());
        assert!(pos.piece_at(Square::new(1)).is_some());
    }
}
