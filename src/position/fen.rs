//! FEN parsing/serialization and UCI long-algebraic move notation.

use std::str::FromStr;

use crate::types::{CastlingRights, Color, Piece, Square};

use super::error::{FenError, MoveParseError};
use super::state::Position;

/// Parse a position from FEN notation.
pub fn from_fen(fen: &str) -> Result<Position, FenError> {
    let mut pos = Position::empty();
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(FenError::WrongFieldCount { found: parts.len() });
    }

    for (rank_from_top, rank_str) in parts[0].split('/').enumerate() {
        if rank_from_top >= 8 {
            return Err(FenError::InvalidPiecePlacement { rank: rank_str.to_string() });
        }
        let rank = 7 - rank_from_top as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
            } else {
                let color = if c.is_uppercase() { Color::White } else { Color::Black };
                let piece = Piece::from_char(c)
                    .ok_or_else(|| FenError::InvalidPiecePlacement { rank: rank_str.to_string() })?;
                if file >= 8 {
                    return Err(FenError::InvalidPiecePlacement { rank: rank_str.to_string() });
                }
                pos.set_piece(Square::from_rank_file(rank, file), color, piece);
                file += 1;
            }
        }
    }

    pos.side_to_move = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::InvalidSideToMove { text: other.to_string() }),
    };

    let mut castling = CastlingRights::none();
    for c in parts[2].chars() {
        match c {
            'K' => castling.set(Color::White, true),
            'Q' => castling.set(Color::White, false),
            'k' => castling.set(Color::Black, true),
            'q' => castling.set(Color::Black, false),
            '-' => {}
            _ => return Err(FenError::InvalidCastlingRights { text: parts[2].to_string() }),
        }
    }
    pos.castling_rights = castling;

    pos.en_passant = if parts[3] == "-" {
        None
    } else {
        parts[3]
            .parse::<Square>()
            .map(Some)
            .map_err(|_| FenError::InvalidEnPassant { text: parts[3].to_string() })?
    };

    pos.halfmove_clock = if parts.len() >= 5 {
        parts[4].parse().map_err(|_| FenError::InvalidHalfmoveClock { text: parts[4].to_string() })?
    } else {
        0
    };

    pos.validate()?;
    pos.finish_construction();
    Ok(pos)
}

/// Serialize a position to FEN notation. The fullmove counter is not tracked by [`Position`]
/// (it plays no role in any rule this core implements), so it is always emitted as `1`.
#[must_use]
pub fn to_fen(pos: &Position) -> String {
    let mut rows = Vec::with_capacity(8);
    for rank in (0..8u8).rev() {
        let mut row = String::new();
        let mut empty = 0u8;
        for file in 0..8u8 {
            let sq = Square::from_rank_file(rank, file);
            if let Some((color, piece)) = pos.piece_at(sq) {
                if empty > 0 {
                    row.push_str(&empty.to_string());
                    empty = 0;
                }
                row.push(piece.to_fen_char(color));
            } else {
                empty += 1;
            }
        }
        if empty > 0 {
            row.push_str(&empty.to_string());
        }
        rows.push(row);
    }

    let active = if pos.side_to_move() == Color::White { "w" } else { "b" };
    let rights = pos.castling_rights();
    let mut castling = String::new();
    if rights.has(Color::White, true) {
        castling.push('K');
    }
    if rights.has(Color::White, false) {
        castling.push('Q');
    }
    if rights.has(Color::Black, true) {
        castling.push('k');
    }
    if rights.has(Color::Black, false) {
        castling.push('q');
    }
    if castling.is_empty() {
        castling.push('-');
    }
    let ep = pos.en_passant_target().map_or_else(|| "-".to_string(), |sq| sq.to_string());

    format!(
        "{} {} {} {} {} 1",
        rows.join("/"),
        active,
        castling,
        ep,
        pos.halfmove_clock()
    )
}

impl Position {
    /// Parse a move in UCI long algebraic notation (e.g. `"e2e4"`, `"e7e8q"`), matching it
    /// against the legal moves from this position.
    pub fn parse_move(&mut self, uci: &str) -> Result<crate::types::Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }
        let from: Square =
            uci[0..2].parse().map_err(|_| MoveParseError::InvalidSquare { notation: uci.to_string() })?;
        let to: Square =
            uci[2..4].parse().map_err(|_| MoveParseError::InvalidSquare { notation: uci.to_string() })?;
        let promotion = if uci.len() == 5 {
            let c = uci.as_bytes()[4] as char;
            let piece = Piece::from_char(c).ok_or(MoveParseError::InvalidPromotion { char: c })?;
            if matches!(piece, Piece::Pawn | Piece::King) {
                return Err(MoveParseError::InvalidPromotion { char: c });
            }
            Some(piece)
        } else {
            None
        };

        let legal = self.generate_all_legal();
        legal
            .iter()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .copied()
            .ok_or_else(|| MoveParseError::IllegalMove { notation: uci.to_string() })
    }

    /// Parse a UCI move and apply it in one call.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<crate::types::Move, MoveParseError> {
        let mv = self.parse_move(uci)?;
        self.make(mv);
        Ok(mv)
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position as PublicPosition;

    #[test]
    fn starting_position_round_trips_through_fen() {
        let pos = PublicPosition::starting_position();
        let fen = to_fen(&pos);
        assert_eq!(fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let reparsed = from_fen(&fen).unwrap();
        assert_eq!(reparsed.hash(), pos.hash());
    }

    #[test]
    fn kiwipete_round_trips() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = from_fen(fen).unwrap();
        assert_eq!(to_fen(&pos), fen);
    }

    #[test]
    fn rejects_too_few_fields() {
        assert!(from_fen("8/8/8/8/8/8/8/8").is_err());
    }

    #[test]
    fn parse_move_finds_legal_pawn_push() {
        let mut pos = PublicPosition::starting_position();
        let mv = pos.parse_move("e2e4").unwrap();
        assert_eq!(mv.to_string(), "e2e4");
    }
}
