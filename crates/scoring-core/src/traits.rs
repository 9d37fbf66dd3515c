use async_trait::async_trait;

use crate::{CompanyObservation, PricePoint, ScoringError, SubFactor};

/// A synchronous, local sub-factor scorer.
///
/// `evaluate` returns the raw outcome; callers settle errors into the neutral
/// score through [`crate::settle`] so every scorer shares one fallback path.
pub trait SubFactorScorer: Send + Sync {
    fn factor(&self) -> SubFactor;

    fn evaluate(&self, observation: &CompanyObservation) -> Result<u8, ScoringError>;
}

/// Source of the technical sub-score. May be local or an external service.
#[async_trait]
pub trait TechnicalBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn technical_score(&self, symbol: &str, prices: &[PricePoint]) -> Result<u8, ScoringError>;
}
