use scoring_core::{
    clamp_score, finite, or_neutral, CompanyObservation, GrowthMetrics, LatestQuote, MomentumRules,
    ScoringConfig, ScoringError, SubFactor, SubFactorScorer,
};

/// Earnings momentum from growth rates and the latest daily move
#[derive(Debug, Clone)]
pub struct MomentumScorer {
    rules: MomentumRules,
    base_score: i32,
}

impl MomentumScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            rules: config.momentum.clone(),
            base_score: config.base_score,
        }
    }

    pub fn score(&self, growth: Option<&GrowthMetrics>, quote: Option<&LatestQuote>) -> u8 {
        or_neutral(self.evaluate_metrics(growth, quote))
    }

    pub fn evaluate_metrics(
        &self,
        growth: Option<&GrowthMetrics>,
        quote: Option<&LatestQuote>,
    ) -> Result<u8, ScoringError> {
        if growth.is_none() && quote.is_none() {
            return Err(ScoringError::InsufficientData(
                "No growth metrics or quote".to_string(),
            ));
        }

        let mut points = 0;

        if let Some(g) = growth {
            let terms = [
                (g.revenue_growth, &self.rules.revenue_growth),
                (g.net_income_growth, &self.rules.net_income_growth),
                (g.free_cash_flow_growth, &self.rules.free_cash_flow_growth),
            ];
            for (value, ladder) in terms {
                if let Some(v) = finite(value) {
                    points += ladder.points(v);
                }
            }
        }

        if let Some(change) = quote.and_then(|q| finite(q.change_percent)) {
            points += self.rules.change_percent.points(change);
        }

        Ok(clamp_score(self.base_score + points))
    }
}

impl Default for MomentumScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl SubFactorScorer for MomentumScorer {
    fn factor(&self) -> SubFactor {
        SubFactor::Momentum
    }

    fn evaluate(&self, observation: &CompanyObservation) -> Result<u8, ScoringError> {
        self.evaluate_metrics(
            observation.growth_metrics.as_ref(),
            observation.latest_quote.as_ref(),
        )
    }
}
