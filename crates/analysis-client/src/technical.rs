use async_trait::async_trait;
use scoring_core::{PricePoint, ScoringError, TechnicalBackend, TechnicalRules};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::AnalysisServiceConfig;

#[derive(Debug, Clone, Serialize)]
struct TechnicalScoreRequest<'a> {
    symbol: &'a str,
    closes: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct TechnicalScoreResponse {
    score: f64,
}

/// Technical scoring delegated to an HTTP analysis service.
///
/// The service receives the most recent `window` closes, the same window the
/// local scorer reads, and answers with a single score. Anything it returns
/// outside 0..=100 is treated as a backend fault.
#[derive(Clone)]
pub struct RemoteTechnicalBackend {
    client: reqwest::Client,
    base_url: String,
    window: usize,
}

impl RemoteTechnicalBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ScoringError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoringError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            window: TechnicalRules::default().window,
        })
    }

    /// Number of trailing closes sent per request
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn from_config(config: &AnalysisServiceConfig) -> Result<Self, ScoringError> {
        Self::new(config.base_url.clone(), config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check service health
    pub async fn health(&self) -> Result<bool, ScoringError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| ScoringError::Backend(format!("Health check failed: {}", e)))?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl TechnicalBackend for RemoteTechnicalBackend {
    fn name(&self) -> &str {
        "remote"
    }

    async fn technical_score(&self, symbol: &str, prices: &[PricePoint]) -> Result<u8, ScoringError> {
        let closes = finite_closes(prices, self.window)?;
        let request = TechnicalScoreRequest { symbol, closes };

        let response = self
            .client
            .post(format!("{}/technical-score", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoringError::Backend(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ScoringError::Backend(format!(
                "Status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScoringError::Backend(format!("Failed to read response: {}", e)))?;

        let score = parse_score(&body)?;
        tracing::debug!("Remote technical score for {}: {}", symbol, score);
        Ok(score)
    }
}

/// The trailing `window` closes. A NaN close cannot be sent as JSON, so a
/// non-numeric close inside the window rejects the series up front.
fn finite_closes(prices: &[PricePoint], window: usize) -> Result<Vec<f64>, ScoringError> {
    let start = prices.len().saturating_sub(window);
    prices[start..]
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if p.close.is_finite() {
                Ok(p.close)
            } else {
                Err(ScoringError::InvalidData(format!(
                    "Non-numeric close at position {}",
                    i
                )))
            }
        })
        .collect()
}

fn parse_score(body: &str) -> Result<u8, ScoringError> {
    let parsed: TechnicalScoreResponse = serde_json::from_str(body)
        .map_err(|e| ScoringError::Backend(format!("Invalid response: {}", e)))?;

    let score = parsed.score;
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err(ScoringError::Backend(format!(
            "Score out of range: {}",
            score
        )));
    }
    Ok(score.round() as u8)
}
