use scoring_core::{ScoreResult, SubFactor, NEUTRAL_SCORE};
use serde::{Deserialize, Serialize};

/// How many scored companies landed on the neutral value per component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeutralCounts {
    pub technical: usize,
    pub momentum: usize,
    pub valuation: usize,
    pub fundamental: usize,
}

impl NeutralCounts {
    pub fn total(&self) -> usize {
        self.technical + self.momentum + self.valuation + self.fundamental
    }

    fn bump(&mut self, factor: SubFactor) {
        match factor {
            SubFactor::Technical => self.technical += 1,
            SubFactor::Momentum => self.momentum += 1,
            SubFactor::Valuation => self.valuation += 1,
            SubFactor::Fundamental => self.fundamental += 1,
        }
    }
}

/// Batch-level statistics for logging and reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub companies: usize,
    pub failures: usize,
    /// Failed companies are not counted here, only their error is
    pub neutral_components: NeutralCounts,
    pub mean_short_term: f64,
    pub mean_long_term: f64,
}

impl BatchSummary {
    pub fn from_results(results: &[ScoreResult]) -> Self {
        let mut summary = BatchSummary {
            companies: results.len(),
            ..Default::default()
        };
        if results.is_empty() {
            return summary;
        }

        let mut short_total = 0u64;
        let mut long_total = 0u64;
        for result in results {
            short_total += result.short_term_score as u64;
            long_total += result.long_term_score as u64;

            if result.is_failed() {
                summary.failures += 1;
                continue;
            }
            for factor in SubFactor::ALL {
                if result.components.get(factor) == NEUTRAL_SCORE {
                    summary.neutral_components.bump(factor);
                }
            }
        }

        let n = results.len() as f64;
        summary.mean_short_term = short_total as f64 / n;
        summary.mean_long_term = long_total as f64 / n;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::{CompanyIdentity, ScoreComponents};

    fn identity(symbol: &str) -> CompanyIdentity {
        CompanyIdentity {
            symbol: symbol.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_batch() {
        let summary = BatchSummary::from_results(&[]);
        assert_eq!(summary.companies, 0);
        assert_eq!(summary.mean_short_term, 0.0);
    }

    #[test]
    fn test_counts_and_means() {
        let scored = ScoreResult::new(
            identity("AAA"),
            ScoreComponents {
                technical: 90,
                momentum: 50,
                valuation: 70,
                fundamental: 50,
            },
            74,
            62,
        );
        let failed = ScoreResult::fallback(identity("BBB"), "boom");

        let summary = BatchSummary::from_results(&[scored, failed]);
        assert_eq!(summary.companies, 2);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.neutral_components.momentum, 1);
        assert_eq!(summary.neutral_components.fundamental, 1);
        assert_eq!(summary.neutral_components.technical, 0);
        assert_eq!(summary.neutral_components.total(), 2);
        assert_eq!(summary.mean_short_term, 62.0);
        assert_eq!(summary.mean_long_term, 56.0);
    }
}
