//! Manual error enums for the position core's construction and I/O boundaries.
//!
//! No `panic!`/`unwrap` at these boundaries; every fallible entry point returns one of these.

use std::fmt;

/// A position descriptor failed validation (builder or FEN) because its invariants don't hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PositionError {
    MissingKing { color_is_white: bool },
    MultipleKings { color_is_white: bool, count: u32 },
    OverlappingPieces { square: u8 },
    PawnOnBackRank { square: u8 },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::MissingKing { color_is_white } => {
                write!(f, "{} king missing", if *color_is_white { "white" } else { "black" })
            }
            PositionError::MultipleKings { color_is_white, count } => write!(
                f,
                "{} has {} kings, expected exactly 1",
                if *color_is_white { "white" } else { "black" },
                count
            ),
            PositionError::OverlappingPieces { square } => {
                write!(f, "square {square} is occupied by more than one piece")
            }
            PositionError::PawnOnBackRank { square } => {
                write!(f, "pawn on back rank at square {square}")
            }
        }
    }
}

impl std::error::Error for PositionError {}

/// FEN text failed to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FenError {
    WrongFieldCount { found: usize },
    InvalidPiecePlacement { rank: String },
    InvalidSideToMove { text: String },
    InvalidCastlingRights { text: String },
    InvalidEnPassant { text: String },
    InvalidHalfmoveClock { text: String },
    Position(PositionError),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount { found } => {
                write!(f, "expected 6 space-separated FEN fields, found {found}")
            }
            FenError::InvalidPiecePlacement { rank } => write!(f, "invalid piece placement rank: {rank}"),
            FenError::InvalidSideToMove { text } => write!(f, "invalid side to move: {text}"),
            FenError::InvalidCastlingRights { text } => write!(f, "invalid castling rights: {text}"),
            FenError::InvalidEnPassant { text } => write!(f, "invalid en passant target: {text}"),
            FenError::InvalidHalfmoveClock { text } => write!(f, "invalid halfmove clock: {text}"),
            FenError::Position(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FenError {}

impl From<PositionError> for FenError {
    fn from(e: PositionError) -> Self {
        FenError::Position(e)
    }
}

/// NNUE weight loading/evaluation failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NnueError {
    /// `evaluate` was called before a network had been loaded into the position.
    NotInitialized,
    /// A weight/bias/scale file could not be read or had the wrong shape.
    Io { file: String, reason: String },
    /// A text field couldn't be parsed as the expected quantized integer.
    MalformedValue { file: String, line: usize },
}

impl fmt::Display for NnueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NnueError::NotInitialized => write!(f, "NNUE network not initialized"),
            NnueError::Io { file, reason } => write!(f, "failed to read NNUE file {file}: {reason}"),
            NnueError::MalformedValue { file, line } => {
                write!(f, "malformed value in NNUE file {file} at line {line}")
            }
        }
    }
}

impl std::error::Error for NnueError {}

/// UCI long-algebraic move text failed to parse, or didn't match any legal move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    InvalidLength { len: usize },
    InvalidSquare { notation: String },
    InvalidPromotion { char: char },
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "expected 4 or 5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => write!(f, "invalid square in {notation:?}"),
            MoveParseError::InvalidPromotion { char } => write!(f, "invalid promotion piece {char:?}"),
            MoveParseError::IllegalMove { notation } => write!(f, "{notation} is not a legal move here"),
        }
    }
}

impl std::error::Error for MoveParseError {}
