use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

impl ScoringError {
    /// Missing or short input. Resolves to the neutral score without a warning.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, ScoringError::InsufficientData(_))
    }
}
