//! The position core: bitboard state, pin/check detection, legal move generation, incremental
//! make/unmake, and the error types surfaced at its construction boundaries.

mod attacks;
pub mod builder;
pub mod error;
pub mod fen;
mod make_unmake;
mod movegen;
mod pins;
mod state;

pub use error::{FenError, MoveParseError, NnueError, PositionError};
pub use fen::{from_fen, to_fen};
pub use state::Position;
