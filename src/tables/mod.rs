//! Precomputed, process-wide immutable attack/ray tables.
//!
//! Everything here is either a `const fn`-built array (evaluated at compile time) or a
//! [`std::sync::LazyLock`] table that is cheap enough to build once at first use. None of it
//! is ever mutated after initialization.

mod leapers;
mod rays;

pub use leapers::{
    black_pawn_attacks, en_passant_target_bit, king_attacks, knight_attacks, white_pawn_attacks,
};
pub use rays::{
    bishop_full_rays, bishop_ray_mask, on_line, ray_between_exclusive, ray_between_inclusive,
    rook_full_rays, rook_ray_mask,
};
