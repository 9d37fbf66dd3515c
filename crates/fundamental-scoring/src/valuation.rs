use scoring_core::{
    clamp_score, finite, or_neutral, require, CompanyObservation, ScoringConfig, ScoringError,
    SubFactor, SubFactorScorer, ValuationRatios, ValuationRules,
};

/// Valuation attractiveness. Lower multiples score higher.
#[derive(Debug, Clone)]
pub struct ValuationScorer {
    rules: ValuationRules,
    base_score: i32,
}

impl ValuationScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            rules: config.valuation.clone(),
            base_score: config.base_score,
        }
    }

    pub fn score(&self, ratios: Option<&ValuationRatios>) -> u8 {
        or_neutral(self.evaluate_ratios(ratios))
    }

    pub fn evaluate_ratios(&self, ratios: Option<&ValuationRatios>) -> Result<u8, ScoringError> {
        let ratios = require(ratios, "Valuation ratios")?;

        // Negative or zero multiples (losses, negative book) carry no signal here
        let terms = [
            (ratios.price_earnings_ratio, &self.rules.price_earnings),
            (ratios.price_to_book_ratio, &self.rules.price_to_book),
            (ratios.enterprise_value_multiple, &self.rules.enterprise_value_multiple),
            (ratios.price_to_sales_ratio, &self.rules.price_to_sales),
        ];
        let points: i32 = terms
            .iter()
            .filter_map(|(value, ladder)| finite(*value).filter(|v| *v > 0.0).map(|v| ladder.points(v)))
            .sum();

        Ok(clamp_score(self.base_score + points))
    }
}

impl Default for ValuationScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl SubFactorScorer for ValuationScorer {
    fn factor(&self) -> SubFactor {
        SubFactor::Valuation
    }

    fn evaluate(&self, observation: &CompanyObservation) -> Result<u8, ScoringError> {
        self.evaluate_ratios(observation.valuation_ratios.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratios(pe: f64, pb: f64, ev: f64, ps: f64) -> ValuationRatios {
        ValuationRatios {
            price_earnings_ratio: Some(pe),
            price_to_book_ratio: Some(pb),
            enterprise_value_multiple: Some(ev),
            price_to_sales_ratio: Some(ps),
        }
    }

    #[test]
    fn test_missing_is_neutral() {
        let scorer = ValuationScorer::default();
        assert!(matches!(
            scorer.evaluate_ratios(None),
            Err(ScoringError::InsufficientData(_))
        ));
        assert_eq!(scorer.score(None), 50);
    }

    #[test]
    fn test_cheap_company_near_max() {
        // 50 + 20 + 15 + 15 + 10
        let score = ValuationScorer::default().score(Some(&ratios(10.0, 1.0, 7.0, 1.0)));
        assert_eq!(score, 100);
    }

    #[test]
    fn test_expensive_company() {
        // 50 - 25 - 20 - 15 - 15
        let score = ValuationScorer::default().score(Some(&ratios(60.0, 12.0, 40.0, 15.0)));
        assert_eq!(score, 0);
    }

    #[test]
    fn test_mid_range() {
        // P/E 20 -> -5, P/B 2 -> +5, EV 10 -> +8, P/S 4 -> -8
        let score = ValuationScorer::default().score(Some(&ratios(20.0, 2.0, 10.0, 4.0)));
        assert_eq!(score, 50);
    }

    #[test]
    fn test_non_positive_ratios_skipped() {
        let scorer = ValuationScorer::default();
        assert_eq!(scorer.score(Some(&ratios(-8.0, 0.0, -3.0, 0.0))), 50);
        assert_eq!(scorer.score(Some(&ValuationRatios::default())), 50);

        let partial = ValuationRatios {
            price_earnings_ratio: Some(-15.0),
            price_to_sales_ratio: Some(1.2),
            ..Default::default()
        };
        assert_eq!(scorer.score(Some(&partial)), 60);
    }

    #[test]
    fn test_lower_pe_never_scores_lower() {
        let scorer = ValuationScorer::default();
        let mut previous = 0;
        for pe in (10..=30).rev() {
            let score = scorer.score(Some(&ratios(pe as f64, 2.0, 10.0, 2.0)));
            assert!(score >= previous, "P/E {} scored {} after {}", pe, score, previous);
            previous = score;
        }
    }
}
