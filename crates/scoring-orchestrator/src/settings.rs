use scoring_core::{ScoringConfig, ScoringError};
use std::path::PathBuf;
use std::time::Duration;

use crate::evaluator::DEFAULT_TECHNICAL_TIMEOUT;

pub const DEFAULT_MAX_CONCURRENCY: usize = 20;

/// Runtime knobs of the scoring engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub technical_timeout: Duration,
    pub max_concurrency: usize,
    pub config_path: Option<PathBuf>,
    pub analysis_service_url: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            technical_timeout: DEFAULT_TECHNICAL_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            config_path: None,
            analysis_service_url: None,
        }
    }
}

impl EngineSettings {
    /// Read settings from the process environment. Call `dotenvy::dotenv()` first
    /// if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, ScoringError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScoringError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_ms: u64 = lookup("SCORING_TECHNICAL_TIMEOUT_MS")
            .unwrap_or_else(|| "5000".to_string())
            .trim()
            .parse()
            .map_err(|e| {
                ScoringError::InvalidConfig(format!("SCORING_TECHNICAL_TIMEOUT_MS: {}", e))
            })?;
        let max_concurrency: usize = lookup("SCORING_MAX_CONCURRENCY")
            .unwrap_or_else(|| "20".to_string())
            .trim()
            .parse()
            .map_err(|e| ScoringError::InvalidConfig(format!("SCORING_MAX_CONCURRENCY: {}", e)))?;

        let settings = Self {
            technical_timeout: Duration::from_millis(timeout_ms),
            max_concurrency,
            config_path: non_empty(lookup("SCORING_CONFIG_PATH")).map(PathBuf::from),
            analysis_service_url: non_empty(lookup("ANALYSIS_SERVICE_URL")),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.technical_timeout.is_zero() {
            return Err(ScoringError::InvalidConfig(
                "technical timeout must be positive".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(ScoringError::InvalidConfig(
                "max concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured threshold table, or the built-in defaults.
    pub fn load_config(&self) -> Result<ScoringConfig, ScoringError> {
        match &self.config_path {
            Some(path) => ScoringConfig::from_json_file(path),
            None => Ok(ScoringConfig::default()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.technical_timeout, Duration::from_millis(5000));
        assert_eq!(settings.max_concurrency, 20);
        assert_eq!(settings.load_config().unwrap(), ScoringConfig::default());
    }

    #[test]
    fn test_overrides() {
        let settings = EngineSettings::from_lookup(lookup(&[
            ("SCORING_TECHNICAL_TIMEOUT_MS", "250"),
            ("SCORING_MAX_CONCURRENCY", " 4 "),
            ("ANALYSIS_SERVICE_URL", "http://analysis:8005"),
            ("SCORING_CONFIG_PATH", ""),
        ]))
        .unwrap();
        assert_eq!(settings.technical_timeout, Duration::from_millis(250));
        assert_eq!(settings.max_concurrency, 4);
        assert_eq!(settings.analysis_service_url.as_deref(), Some("http://analysis:8005"));
        assert_eq!(settings.config_path, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        for pairs in [
            [("SCORING_TECHNICAL_TIMEOUT_MS", "soon")],
            [("SCORING_TECHNICAL_TIMEOUT_MS", "0")],
            [("SCORING_MAX_CONCURRENCY", "0")],
            [("SCORING_MAX_CONCURRENCY", "-2")],
        ] {
            assert!(matches!(
                EngineSettings::from_lookup(lookup(&pairs)),
                Err(ScoringError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_missing_config_file() {
        let settings = EngineSettings {
            config_path: Some(PathBuf::from("/nonexistent/scoring.json")),
            ..Default::default()
        };
        assert!(matches!(settings.load_config(), Err(ScoringError::InvalidConfig(_))));
    }
}
