use scoring_core::{clamp_rounded, CompositeWeights, ScoreComponents, ScoringConfig};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompositeScores {
    pub short_term: u8,
    pub long_term: u8,
}

/// Blends the four sub-scores into the two investment horizons.
#[derive(Debug, Clone)]
pub struct CompositeAggregator {
    weights: CompositeWeights,
}

impl CompositeAggregator {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            weights: config.weights,
        }
    }

    pub fn aggregate(&self, components: &ScoreComponents) -> CompositeScores {
        let w = &self.weights;
        let short_term =
            components.technical as f64 * w.technical + components.momentum as f64 * w.momentum;
        let long_term =
            components.valuation as f64 * w.valuation + components.fundamental as f64 * w.fundamental;

        // Inputs are already bounded; the clamp only absorbs rounding drift
        CompositeScores {
            short_term: clamp_rounded(short_term),
            long_term: clamp_rounded(long_term),
        }
    }
}

impl Default for CompositeAggregator {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
