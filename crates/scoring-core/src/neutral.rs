//! The single "no information → 50" rule shared by every sub-factor.

use crate::{ScoringError, SubFactor};

/// Midpoint score meaning "no information", not "average".
pub const NEUTRAL_SCORE: u8 = 50;
pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 100;

/// Clamp an additive point total into the score range.
pub fn clamp_score(raw: i32) -> u8 {
    raw.clamp(MIN_SCORE as i32, MAX_SCORE as i32) as u8
}

/// Round a weighted blend and clamp it into the score range.
pub fn clamp_rounded(raw: f64) -> u8 {
    if !raw.is_finite() {
        return NEUTRAL_SCORE;
    }
    raw.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u8
}

/// Keep a metric only when it is present and a real number.
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// A required input group, or `InsufficientData` naming what was missing.
pub fn require<'a, T>(group: Option<&'a T>, what: &str) -> Result<&'a T, ScoringError> {
    group.ok_or_else(|| ScoringError::InsufficientData(format!("{} not available", what)))
}

/// Collapse a sub-factor outcome to a bounded score. Any error is neutral.
pub fn or_neutral(result: Result<u8, ScoringError>) -> u8 {
    match result {
        Ok(score) => score.min(MAX_SCORE),
        Err(_) => NEUTRAL_SCORE,
    }
}

/// Same as [`or_neutral`], logging faults as warnings and missing data at debug.
pub fn settle(factor: SubFactor, symbol: &str, result: Result<u8, ScoringError>) -> u8 {
    match &result {
        Ok(_) => {}
        Err(e) if e.is_missing_data() => {
            tracing::debug!("{} {} score neutral: {}", symbol, factor, e);
        }
        Err(e) => {
            tracing::warn!("{} {} score failed, using neutral: {}", symbol, factor, e);
        }
    }
    or_neutral(result)
}
