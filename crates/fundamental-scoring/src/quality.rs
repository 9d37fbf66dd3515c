use scoring_core::{
    clamp_score, finite, or_neutral, require, CompanyObservation, QualityRatios, QualityRules,
    ScoringConfig, ScoringError, SubFactor, SubFactorScorer,
};

/// Business quality from profitability, leverage and liquidity
#[derive(Debug, Clone)]
pub struct FundamentalScorer {
    rules: QualityRules,
    base_score: i32,
}

impl FundamentalScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            rules: config.quality.clone(),
            base_score: config.base_score,
        }
    }

    pub fn score(&self, ratios: Option<&QualityRatios>) -> u8 {
        or_neutral(self.evaluate_ratios(ratios))
    }

    pub fn evaluate_ratios(&self, ratios: Option<&QualityRatios>) -> Result<u8, ScoringError> {
        let ratios = require(ratios, "Quality ratios")?;
        let rules = &self.rules;
        let mut points = 0;

        if let Some(roe) = finite(ratios.return_on_equity).filter(|v| *v > 0.0) {
            points += rules.return_on_equity.points(roe);
        }

        // Zero debt is the best case, so only negative leverage is skipped
        if let Some(d2e) = finite(ratios.debt_equity_ratio).filter(|v| *v >= 0.0) {
            points += rules.debt_to_equity.points(d2e);
        }

        if let Some(current) = finite(ratios.current_ratio).filter(|v| *v > 0.0) {
            points += rules.current_ratio.points(current);
        }

        if let Some(margin) = finite(ratios.net_profit_margin).filter(|v| *v > 0.0) {
            points += rules.net_margin.points(margin);
        }

        Ok(clamp_score(self.base_score + points))
    }
}

impl Default for FundamentalScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl SubFactorScorer for FundamentalScorer {
    fn factor(&self) -> SubFactor {
        SubFactor::Fundamental
    }

    fn evaluate(&self, observation: &CompanyObservation) -> Result<u8, ScoringError> {
        self.evaluate_ratios(observation.quality_ratios.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratios(roe: f64, d2e: f64, current: f64, margin: f64) -> QualityRatios {
        QualityRatios {
            return_on_equity: Some(roe),
            debt_equity_ratio: Some(d2e),
            current_ratio: Some(current),
            net_profit_margin: Some(margin),
        }
    }

    #[test]
    fn test_missing_is_neutral() {
        let scorer = FundamentalScorer::default();
        assert!(matches!(
            scorer.evaluate_ratios(None),
            Err(ScoringError::InsufficientData(_))
        ));
        assert_eq!(scorer.score(None), 50);
    }

    #[test]
    fn test_high_quality_company() {
        // 50 + 25 + 20 + 15 + 20
        assert_eq!(FundamentalScorer::default().score(Some(&ratios(0.30, 0.1, 3.0, 0.25))), 100);
    }

    #[test]
    fn test_weak_company() {
        // ROE 0.05 -> -10, D/E 2.5 -> -20, current 0.8 -> -15, margin 0.02 -> -10
        assert_eq!(FundamentalScorer::default().score(Some(&ratios(0.05, 2.5, 0.8, 0.02))), 0);
    }

    #[test]
    fn test_middle_tiers() {
        // ROE 0.15 -> +12, D/E 0.8 -> 0, current 1.3 -> +5, margin 0.12 -> +10
        assert_eq!(FundamentalScorer::default().score(Some(&ratios(0.15, 0.8, 1.3, 0.12))), 77);
        // ROE 0.20 -> +18, D/E 0.5 -> +10, current 1.1 -> -5, margin 0.07 -> +5
        assert_eq!(FundamentalScorer::default().score(Some(&ratios(0.20, 0.5, 1.1, 0.07))), 78);
    }

    #[test]
    fn test_zero_debt_counts() {
        let only_debt = QualityRatios {
            debt_equity_ratio: Some(0.0),
            ..Default::default()
        };
        assert_eq!(FundamentalScorer::default().score(Some(&only_debt)), 70);
    }

    #[test]
    fn test_non_positive_values_skipped() {
        // Losses and negative equity are not scored rather than penalized
        let r = ratios(-0.40, -1.5, 0.0, -0.10);
        assert_eq!(FundamentalScorer::default().score(Some(&r)), 50);
        assert_eq!(FundamentalScorer::default().score(Some(&QualityRatios::default())), 50);
    }
}
