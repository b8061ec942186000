//! Quantized network weights and the two small layers beyond the accumulator.
//!
//! Shape: `INPUT_SIZE -> HIDDEN1` (the accumulator, maintained incrementally per perspective)
//! `-> HIDDEN2 -> 1`, with a ReLU clamped to `[0, 1]` between each layer. Weights are
//! quantized int8; biases and the final output scale are plain `f32`, loaded from five text
//! (CSV) files so a trained network can be dropped in without a custom binary format.

use std::fs;
use std::path::Path;

use crate::position::error::NnueError;

use super::accumulator::PERSPECTIVE_SLOTS;
use super::QUANT_SCALE;

/// 64 king buckets * 10 perspective-relative piece slots * 64 squares.
pub const INPUT_SIZE: usize = 64 * PERSPECTIVE_SLOTS * 64;

/// Kept deliberately small: the bundled default network (see `embedded_nnue`) is a
/// shape-correct smoke-test network, not a trained one. Real networks of any `HIDDEN1`/
/// `HIDDEN2` can be loaded at runtime via [`NnueNetwork::load`] as long as the five files
/// agree with these dimensions.
pub const HIDDEN1: usize = 4;
pub const HIDDEN2: usize = 4;

pub struct NnueNetwork {
    pub(crate) feature_weights: Vec<[i8; HIDDEN1]>,
    pub(crate) feature_bias: [f32; HIDDEN1],
    pub(crate) hidden_weights: [[i8; HIDDEN2]; HIDDEN1 * 2],
    pub(crate) hidden_bias: [f32; HIDDEN2],
    pub(crate) output_weights: [i8; HIDDEN2],
    pub(crate) output_bias: f32,
    pub(crate) scale: f32,
}

fn parse_i8_row(line: &str, cols: usize, file: &str, row: usize) -> Result<Vec<i8>, NnueError> {
    let values: Result<Vec<i8>, _> = line.split(',').map(|v| v.trim().parse::<i8>()).collect();
    let values = values.map_err(|_| NnueError::MalformedValue { file: file.to_string(), line: row })?;
    if values.len() != cols {
        return Err(NnueError::Io {
            file: file.to_string(),
            reason: format!("expected {cols} columns, found {}", values.len()),
        });
    }
    Ok(values)
}

fn parse_f32_row(line: &str, cols: usize, file: &str) -> Result<Vec<f32>, NnueError> {
    let values: Result<Vec<f32>, _> = line.split(',').map(|v| v.trim().parse::<f32>()).collect();
    let values = values.map_err(|_| NnueError::MalformedValue { file: file.to_string(), line: 0 })?;
    if values.len() != cols {
        return Err(NnueError::Io {
            file: file.to_string(),
            reason: format!("expected {cols} columns, found {}", values.len()),
        });
    }
    Ok(values)
}

impl NnueNetwork {
    /// Load a network from a directory containing the five expected CSV files:
    /// `feature_weights.csv` (`INPUT_SIZE` rows x `HIDDEN1`), `feature_bias.csv` (1 row),
    /// `hidden_weights.csv` (`2*HIDDEN1` rows x `HIDDEN2`), `hidden_bias.csv` (1 row), and
    /// `output.csv` (weights row, bias row, scale row).
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, NnueError> {
        let dir = dir.as_ref();
        let read = |name: &str| -> Result<String, NnueError> {
            fs::read_to_string(dir.join(name))
                .map_err(|e| NnueError::Io { file: name.to_string(), reason: e.to_string() })
        };
        Self::from_sources(
            &read("feature_weights.csv")?,
            &read("feature_bias.csv")?,
            &read("hidden_weights.csv")?,
            &read("hidden_bias.csv")?,
            &read("output.csv")?,
        )
    }

    fn from_sources(
        feature_weights: &str,
        feature_bias: &str,
        hidden_weights: &str,
        hidden_bias: &str,
        output: &str,
    ) -> Result<Self, NnueError> {
        let mut weights = Vec::with_capacity(INPUT_SIZE);
        for (row, line) in feature_weights.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let values = parse_i8_row(line, HIDDEN1, "feature_weights.csv", row)?;
            let mut arr = [0i8; HIDDEN1];
            arr.copy_from_slice(&values);
            weights.push(arr);
        }
        if weights.len() != INPUT_SIZE {
            return Err(NnueError::Io {
                file: "feature_weights.csv".to_string(),
                reason: format!("expected {INPUT_SIZE} rows, found {}", weights.len()),
            });
        }

        let bias_line = feature_bias.lines().next().unwrap_or_default();
        let bias_values = parse_f32_row(bias_line, HIDDEN1, "feature_bias.csv")?;
        let mut feature_bias_arr = [0f32; HIDDEN1];
        feature_bias_arr.copy_from_slice(&bias_values);

        let mut hidden_weights_arr = [[0i8; HIDDEN2]; HIDDEN1 * 2];
        let mut hw_rows = 0usize;
        for (row, line) in hidden_weights.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let values = parse_i8_row(line, HIDDEN2, "hidden_weights.csv", row)?;
            hidden_weights_arr[hw_rows].copy_from_slice(&values);
            hw_rows += 1;
        }
        if hw_rows != HIDDEN1 * 2 {
            return Err(NnueError::Io {
                file: "hidden_weights.csv".to_string(),
                reason: format!("expected {} rows, found {hw_rows}", HIDDEN1 * 2),
            });
        }

        let hidden_bias_line = hidden_bias.lines().next().unwrap_or_default();
        let hidden_bias_values = parse_f32_row(hidden_bias_line, HIDDEN2, "hidden_bias.csv")?;
        let mut hidden_bias_arr = [0f32; HIDDEN2];
        hidden_bias_arr.copy_from_slice(&hidden_bias_values);

        let mut output_lines = output.lines().filter(|l| !l.trim().is_empty());
        let weights_line = output_lines.next().ok_or_else(|| NnueError::Io {
            file: "output.csv".to_string(),
            reason: "missing weights row".to_string(),
        })?;
        let output_weights_values = parse_i8_row(weights_line, HIDDEN2, "output.csv", 0)?;
        let mut output_weights_arr = [0i8; HIDDEN2];
        output_weights_arr.copy_from_slice(&output_weights_values);

        let bias_line = output_lines.next().ok_or_else(|| NnueError::Io {
            file: "output.csv".to_string(),
            reason: "missing bias row".to_string(),
        })?;
        let output_bias = bias_line.trim().parse::<f32>().map_err(|_| NnueError::MalformedValue {
            file: "output.csv".to_string(),
            line: 1,
        })?;

        let scale_line = output_lines.next().ok_or_else(|| NnueError::Io {
            file: "output.csv".to_string(),
            reason: "missing scale row".to_string(),
        })?;
        let scale = scale_line.trim().parse::<f32>().map_err(|_| NnueError::MalformedValue {
            file: "output.csv".to_string(),
            line: 2,
        })?;

        Ok(NnueNetwork {
            feature_weights: weights,
            feature_bias: feature_bias_arr,
            hidden_weights: hidden_weights_arr,
            hidden_bias: hidden_bias_arr,
            output_weights: output_weights_arr,
            output_bias,
            scale,
        })
    }

    /// A deterministic, shape-correct, all-zero network used by tests and as a last-resort
    /// fallback; never returned by `load`.
    #[must_use]
    pub fn placeholder() -> Self {
        NnueNetwork {
            feature_weights: vec![[0i8; HIDDEN1]; INPUT_SIZE],
            feature_bias: [0.0; HIDDEN1],
            hidden_weights: [[0i8; HIDDEN2]; HIDDEN1 * 2],
            hidden_bias: [0.0; HIDDEN2],
            output_weights: [0i8; HIDDEN2],
            output_bias: 0.0,
            scale: 1.0,
        }
    }

    #[inline]
    fn clipped_relu(x: f32) -> f32 {
        x.clamp(0.0, 1.0)
    }

    /// Evaluate the two layers beyond the accumulator. `us`/`them` are the raw (pre-bias)
    /// int32 accumulator sums for the side to move and its opponent, respectively; the
    /// returned scalar is already from the side-to-move's perspective.
    #[must_use]
    pub fn evaluate(&self, us: &[i32; HIDDEN1], them: &[i32; HIDDEN1]) -> f32 {
        let mut layer1 = [0f32; HIDDEN1 * 2];
        for i in 0..HIDDEN1 {
            layer1[i] = Self::clipped_relu(us[i] as f32 / QUANT_SCALE + self.feature_bias[i]);
            layer1[HIDDEN1 + i] = Self::clipped_relu(them[i] as f32 / QUANT_SCALE + self.feature_bias[i]);
        }

        let mut layer2 = [0f32; HIDDEN2];
        for j in 0..HIDDEN2 {
            let mut sum = self.hidden_bias[j];
            for (i, &activation) in layer1.iter().enumerate() {
                sum += activation * (f32::from(self.hidden_weights[i][j]) / QUANT_SCALE);
            }
            layer2[j] = Self::clipped_relu(sum);
        }

        let mut output = self.output_bias;
        for j in 0..HIDDEN2 {
            output += layer2[j] * (f32::from(self.output_weights[j]) / QUANT_SCALE);
        }
        output * self.scale
    }
}

#[cfg(feature = "embedded_nnue")]
mod embedded {
    use super::NnueNetwork;

    const FEATURE_WEIGHTS: &str = include_str!("nets/default/feature_weights.csv");
    const FEATURE_BIAS: &str = include_str!("nets/default/feature_bias.csv");
    const HIDDEN_WEIGHTS: &str = include_str!("nets/default/hidden_weights.csv");
    const HIDDEN_BIAS: &str = include_str!("nets/default/hidden_bias.csv");
    const OUTPUT: &str = include_str!("nets/default/output.csv");

    impl NnueNetwork {
        /// The bundled smoke-test network, compiled into the binary. Not a trained network —
        /// see [`super::HIDDEN1`]'s documentation.
        #[must_use]
        pub fn from_embedded() -> Self {
            Self::from_sources(FEATURE_WEIGHTS, FEATURE_BIAS, HIDDEN_WEIGHTS, HIDDEN_BIAS, OUTPUT)
                .expect("embedded default NNUE network is malformed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_network_evaluates_to_zero() {
        let net = NnueNetwork::placeholder();
        let zeros = [0i32; HIDDEN1];
        assert_eq!(net.evaluate(&zeros, &zeros), 0.0);
    }

    #[test]
    fn loading_from_malformed_source_reports_error() {
        let err = NnueNetwork::from_sources("1,2,3", "0,0,0,0", "", "0,0,0,0", "0,0,0,0\n0\n1").unwrap_err();
        matches!(err, NnueError::Io { .. } | NnueError::MalformedValue { .. });
    }

    #[cfg(feature = "embedded_nnue")]
    #[test]
    fn embedded_network_loads() {
        let _ = NnueNetwork::from_embedded();
    }
}
