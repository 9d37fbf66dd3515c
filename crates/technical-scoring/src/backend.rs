use async_trait::async_trait;
use scoring_core::{PricePoint, ScoringConfig, ScoringError, TechnicalBackend};

use crate::TechnicalScorer;

/// Runs the technical scorer in-process.
#[derive(Debug, Clone, Default)]
pub struct LocalTechnicalBackend {
    scorer: TechnicalScorer,
}

impl LocalTechnicalBackend {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            scorer: TechnicalScorer::new(config),
        }
    }
}

#[async_trait]
impl TechnicalBackend for LocalTechnicalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn technical_score(&self, symbol: &str, prices: &[PricePoint]) -> Result<u8, ScoringError> {
        tracing::trace!("Local technical score for {} over {} closes", symbol, prices.len());
        self.scorer.evaluate_prices(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_backend_matches_scorer() {
        let prices: Vec<PricePoint> = (0..60)
            .map(|i| PricePoint::new(format!("d{}", i), 100.0 + i as f64))
            .collect();
        let backend = LocalTechnicalBackend::default();
        assert_eq!(backend.name(), "local");
        assert_eq!(backend.technical_score("UP", &prices).await, Ok(100));
    }

    #[tokio::test]
    async fn test_local_backend_reports_short_history() {
        let backend = LocalTechnicalBackend::default();
        let result = backend.technical_score("NEW", &[PricePoint::new("d0", 10.0)]).await;
        assert!(matches!(result, Err(ScoringError::InsufficientData(_))));
    }
}
