//! Incremental NNUE-style evaluator: a king-bucketed, dual-perspective feature accumulator
//! feeding two small quantized linear-ReLU layers and a linear output.

mod accumulator;
mod network;

pub use accumulator::{sub_feature_index, NnueAccumulator, PERSPECTIVE_SLOTS};
pub use network::{NnueNetwork, HIDDEN1, HIDDEN2, INPUT_SIZE};

/// Weight quantization scale applied when dequantizing int8 weights back to float space
/// (`weight_i8 as f32 / QUANT_SCALE`), matching the reference crate's own fixed-point
/// convention for its simpler single-layer network.
pub const QUANT_SCALE: f32 = 64.0;
