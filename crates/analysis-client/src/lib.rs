pub mod technical;

pub use technical::RemoteTechnicalBackend;

use std::time::Duration;

/// Configuration for the remote analysis service
#[derive(Debug, Clone)]
pub struct AnalysisServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AnalysisServiceConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("ANALYSIS_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8005".to_string()),
            timeout: Duration::from_secs(5),
        }
    }
}
