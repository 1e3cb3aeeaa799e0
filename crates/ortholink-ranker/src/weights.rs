//! Score components and their weighting.
//! Default weights: 1.0 for the two absolute alignment terms, 1.5 for the two ratios.

use ortholink_common::ParalogWeights;
use serde::{Deserialize, Serialize};

/// The four unweighted terms of a paralog score. A term whose inputs are
/// missing is 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// length × similarity / 100
    pub abs_similarity: f64,
    /// length × identity / 100
    pub abs_identity: f64,
    /// matched / (possible + ε)
    pub method_ratio: f64,
    /// length / max_length
    pub length_ratio: f64,
}

impl ScoreComponents {
    /// Same order as [`ParalogWeights::as_array`].
    pub fn as_array(&self) -> [f64; 4] {
        [self.abs_similarity, self.abs_identity, self.method_ratio, self.length_ratio]
    }

    pub fn weighted_sum(&self, weights: &ParalogWeights) -> f64 {
        self.as_array()
            .iter()
            .zip(weights.as_array().iter())
            .map(|(c, w)| c * w)
            .sum()
    }
}
