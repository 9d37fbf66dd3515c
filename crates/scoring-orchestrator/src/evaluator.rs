use scoring_core::{
    settle, CompanyObservation, ScoringConfig, ScoringError, SubFactor, SubFactorScorer,
    TechnicalBackend,
};
use std::time::Duration;

pub const DEFAULT_TECHNICAL_TIMEOUT: Duration = Duration::from_millis(5000);

/// Turns every sub-factor outcome into a bounded score.
///
/// Synchronous scorers and the technical backend go through the same
/// [`settle`] call, so a timeout is handled exactly like any other fault.
#[derive(Debug, Clone)]
pub struct SubFactorEvaluator {
    technical_timeout: Duration,
    min_history: usize,
}

impl SubFactorEvaluator {
    pub fn new(config: &ScoringConfig, technical_timeout: Duration) -> Self {
        Self {
            technical_timeout,
            min_history: config.technical.min_history,
        }
    }

    pub fn technical_timeout(&self) -> Duration {
        self.technical_timeout
    }

    pub fn with_technical_timeout(mut self, timeout: Duration) -> Self {
        self.technical_timeout = timeout;
        self
    }

    pub fn evaluate(&self, scorer: &dyn SubFactorScorer, observation: &CompanyObservation) -> u8 {
        settle(scorer.factor(), &observation.symbol, scorer.evaluate(observation))
    }

    pub async fn evaluate_technical(
        &self,
        backend: &dyn TechnicalBackend,
        observation: &CompanyObservation,
    ) -> u8 {
        let result = self.race_technical(backend, observation).await;
        settle(SubFactor::Technical, &observation.symbol, result)
    }

    /// Raw technical outcome, bounded by the soft deadline.
    pub async fn race_technical(
        &self,
        backend: &dyn TechnicalBackend,
        observation: &CompanyObservation,
    ) -> Result<u8, ScoringError> {
        let prices = &observation.historical_prices;
        // Short history never reaches the backend, whichever one is plugged in
        if prices.len() < self.min_history {
            return Err(ScoringError::InsufficientData(format!(
                "Need at least {} closes, got {}",
                self.min_history,
                prices.len()
            )));
        }

        match tokio::time::timeout(
            self.technical_timeout,
            backend.technical_score(&observation.symbol, prices),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ScoringError::Timeout(self.technical_timeout.as_millis() as u64)),
        }
    }
}

impl Default for SubFactorEvaluator {
    fn default() -> Self {
        Self::new(&ScoringConfig::default(), DEFAULT_TECHNICAL_TIMEOUT)
    }
}
