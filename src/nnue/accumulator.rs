//! Dual-perspective, king-bucketed feature accumulator.
//!
//! Each perspective (white's view, black's view) has its own hidden-layer accumulator, indexed
//! by that perspective's own king square. A king move invalidates only that perspective's
//! accumulator — the other side's features don't reference the king that moved — so it is
//! fully recomputed via [`NnueAccumulator::refresh`]; every other move applies an O(`HIDDEN1`)
//! delta via [`NnueAccumulator::add_feature`]/[`NnueAccumulator::remove_feature`].

use crate::types::{Color, Piece, Square};

use super::network::{NnueNetwork, HIDDEN1, INPUT_SIZE};

/// Ten feature slots per king bucket: own {pawn,knight,bishop,rook,queen}, then the same five
/// for the opponent. Kings are never themselves a feature — they select the bucket.
pub const PERSPECTIVE_SLOTS: usize = 10;

fn perspective_offset(piece: Piece, piece_color: Color, perspective: Color) -> usize {
    let base = if piece_color == perspective { 0 } else { 5 };
    base + match piece {
        Piece::Pawn => 0,
        Piece::Knight => 1,
        Piece::Bishop => 2,
        Piece::Rook => 3,
        Piece::Queen => 4,
        Piece::King => unreachable!("kings are never an accumulator feature"),
    }
}

/// The sub-index (0..640) of a piece-on-square feature from a given perspective, before
/// folding in the king bucket. Black's perspective mirrors the board vertically so that both
/// perspectives see their own back rank as rank 1.
#[must_use]
pub fn sub_feature_index(piece: Piece, piece_color: Color, square: Square, perspective: Color) -> usize {
    let oriented_square = if perspective == Color::Black { square.flip_vertical() } else { square };
    perspective_offset(piece, piece_color, perspective) * 64 + oriented_square.as_index()
}

/// Full feature index (0..`INPUT_SIZE`), folding in the perspective's own (possibly mirrored)
/// king square as the bucket.
#[must_use]
pub fn feature_index(king_square: Square, perspective: Color, sub_index: usize) -> usize {
    let oriented_king = if perspective == Color::Black { king_square.flip_vertical() } else { king_square };
    let idx = oriented_king.as_index() * PERSPECTIVE_SLOTS * 64 + sub_index;
    debug_assert!(idx < INPUT_SIZE);
    idx
}

/// The incremental hidden-layer-1 activations, one vector per perspective.
#[derive(Clone)]
pub struct NnueAccumulator {
    pub(crate) white: [i32; HIDDEN1],
    pub(crate) black: [i32; HIDDEN1],
}

impl Default for NnueAccumulator {
    fn default() -> Self {
        NnueAccumulator { white: [0; HIDDEN1], black: [0; HIDDEN1] }
    }
}

impl NnueAccumulator {
    fn vector_mut(&mut self, perspective: Color) -> &mut [i32; HIDDEN1] {
        match perspective {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    #[must_use]
    pub(crate) fn vector(&self, perspective: Color) -> &[i32; HIDDEN1] {
        match perspective {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Apply `+= feature_weights[row]` to one perspective's accumulator.
    pub fn add_feature(&mut self, perspective: Color, king_square: Square, sub_index: usize, net: &NnueNetwork) {
        let row = feature_index(king_square, perspective, sub_index);
        let weights = &net.feature_weights[row];
        let acc = self.vector_mut(perspective);
        for i in 0..HIDDEN1 {
            acc[i] += i32::from(weights[i]);
        }
    }

    /// Apply `-= feature_weights[row]` to one perspective's accumulator.
    pub fn remove_feature(&mut self, perspective: Color, king_square: Square, sub_index: usize, net: &NnueNetwork) {
        let row = feature_index(king_square, perspective, sub_index);
        let weights = &net.feature_weights[row];
        let acc = self.vector_mut(perspective);
        for i in 0..HIDDEN1 {
            acc[i] -= i32::from(weights[i]);
        }
    }

    /// Full recompute of one perspective's accumulator from scratch (biases plus every active
    /// feature). Required whenever that perspective's own king moves, since the king square
    /// selects the bucket every other feature index is built from.
    pub fn refresh<I: IntoIterator<Item = (Piece, Color, Square)>>(
        &mut self,
        perspective: Color,
        king_square: Square,
        active_pieces: I,
        net: &NnueNetwork,
    ) {
        // Biases are folded in later, at dequantization time in `NnueNetwork::evaluate`.
        let mut fresh = [0i32; HIDDEN1];
        for (piece, color, square) in active_pieces {
            let sub = sub_feature_index(piece, color, square, perspective);
            let row = feature_index(king_square, perspective, sub);
            let weights = &net.feature_weights[row];
            for i in 0..HIDDEN1 {
                fresh[i] += i32::from(weights[i]);
            }
        }
        *self.vector_mut(perspective) = fresh;
    }

    /// Evaluate the position from the side to move's perspective.
    #[must_use]
    pub fn evaluate(&self, white_to_move: bool, net: &NnueNetwork) -> f32 {
        let (us, them) = if white_to_move { (&self.white, &self.black) } else { (&self.black, &self.white) };
        net.evaluate(us, them)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_is_identity() {
        let net = NnueNetwork::placeholder();
        let mut acc = NnueAccumulator::default();
        let before = acc.white;
        let king = Square::new(4);
        let sub = sub_feature_index(Piece::Knight, Color::White, Square::new(20), Color::White);
        acc.add_feature(Color::White, king, sub, &net);
        acc.remove_feature(Color::White, king, sub, &net);
        assert_eq!(acc.white, before);
    }

    #[test]
    fn black_perspective_mirrors_square_and_king() {
        let sub_white_home = sub_feature_index(Piece::Pawn, Color::Black, Square::new(8), Color::Black);
        let sub_white_home_from_rank7 = sub_feature_index(Piece::Pawn, Color::Black, Square::new(48), Color::Black);
        // A black pawn on its own rank-2-from-black's-view (square 48, rank 7) should map to
        // the same sub-index as a pawn on rank 2 (square 8) would from white's perspective,
        // once mirrored.
        assert_ne!(sub_white_home, sub_white_home_from_rank7);
    }

    #[test]
    fn refresh_matches_incremental_updates() {
        let net = NnueNetwork::placeholder();
        let king = Square::new(4);
        let pieces = vec![
            (Piece::Pawn, Color::White, Square::new(12)),
            (Piece::Knight, Color::Black, Square::new(45)),
        ];
        let mut refreshed = NnueAccumulator::default();
        refreshed.refresh(Color::White, king, pieces.clone(), &net);

        let mut incremental = NnueAccumulator::default();
        for (piece, color, square) in pieces {
            let sub = sub_feature_index(piece, color, square, Color::White);
            incremental.add_feature(Color::White, king, sub, &net);
        }
        assert_eq!(refreshed.white, incremental.white);
    }
}
