//! Scalar rescaling applied to ranking components.

use serde::{Deserialize, Serialize};

/// Pure same-length mapping from raw ranking values to rescaled values.
pub trait Scaling: Send + Sync {
    /// Rescales `values`; the output has the same length as the input.
    fn scale(&self, values: &[f64]) -> Vec<f64>;
}

/// Min-max feature scaling onto `[0, 1]`.
///
/// With `maximize` the smallest input maps to 0 and the largest to 1;
/// otherwise the direction is flipped so the smallest input maps to 1.
/// A constant input has no spread and maps to all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureScale {
    /// Whether larger inputs should produce larger outputs.
    pub maximize: bool,
}

impl FeatureScale {
    /// Scaling where larger inputs score higher.
    pub const fn maximizing() -> Self {
        Self { maximize: true }
    }

    /// Scaling where smaller inputs score higher.
    pub const fn minimizing() -> Self {
        Self { maximize: false }
    }
}

impl Scaling for FeatureScale {
    fn scale(&self, values: &[f64]) -> Vec<f64> {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let spread = max - min;
        if !(spread > 0.0) || !spread.is_finite() {
            return vec![0.0; values.len()];
        }
        values
            .iter()
            .map(|&value| {
                if self.maximize {
                    (value - min) / spread
                } else {
                    (max - value) / spread
                }
            })
            .collect()
    }
}

/// Leaves values untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity;

impl Scaling for Identity {
    fn scale(&self, values: &[f64]) -> Vec<f64> {
        values.to_vec()
    }
}
