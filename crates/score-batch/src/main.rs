//! score-batch: Score a batch of company observations and write a JSON report.
//!
//! Usage:
//!   cargo run -p score-batch -- --input companies.json
//!   cat companies.json | cargo run -p score-batch -- --input - --output scores.json
//!   cargo run -p score-batch -- --input companies.json --concurrency 8 --timeout-ms 2000
//!   cargo run -p score-batch -- --input companies.json --analysis-url http://localhost:8005
//!
//! Flags override SCORING_* / ANALYSIS_SERVICE_URL from the environment.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use analysis_client::RemoteTechnicalBackend;
use anyhow::{Context, Result};
use scoring_orchestrator::{EngineSettings, ScoringOrchestrator};

mod report;

use report::BatchReport;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    // Logs go to stderr so stdout stays a clean report
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let args: Vec<String> = std::env::args().collect();

    let Some(input) = flag_value(&args, "--input") else {
        eprintln!("Usage:");
        eprintln!("  score-batch --input PATH|-        JSON array of company observations");
        eprintln!("  Options:");
        eprintln!("    --output PATH                   Write the report here (default stdout)");
        eprintln!("    --concurrency N                 Companies scored in parallel (default 20)");
        eprintln!("    --timeout-ms N                  Technical score deadline (default 5000)");
        eprintln!("    --config PATH                   Threshold/weight table (JSON)");
        eprintln!("    --analysis-url URL              Use a remote technical scoring service");
        std::process::exit(2);
    };

    let settings = apply_flags(EngineSettings::from_env()?, &args)?;
    let config = settings.load_config()?;
    let window = config.technical.window;
    let mut orchestrator = ScoringOrchestrator::new(config)
        .with_technical_timeout(settings.technical_timeout)
        .with_max_concurrency(settings.max_concurrency);

    if let Some(url) = &settings.analysis_service_url {
        let backend = RemoteTechnicalBackend::new(url.clone(), settings.technical_timeout)?
            .with_window(window);
        match backend.health().await {
            Ok(true) => tracing::info!("Using remote technical scoring at {}", url),
            _ => tracing::warn!(
                "Analysis service at {} is not healthy; technical scores may fall back to neutral",
                url
            ),
        }
        orchestrator = orchestrator.with_technical_backend(Arc::new(backend));
    }

    let raw = read_input(input)?;
    let records = report::decode_batch(&raw)?;
    tracing::info!("Loaded {} records from {}", records.len(), input);

    let scored = orchestrator.score_batch(report::observations(&records)).await;
    let report = BatchReport::new(report::assemble(records, scored));

    let json = serde_json::to_string_pretty(&report)?;
    match flag_value(&args, "--output") {
        Some(path) if path != "-" => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
            tracing::info!("Report written to {}", path);
        }
        _ => println!("{}", json),
    }

    tracing::info!(
        "Done: {} companies, {} failures, mean short {:.1}, mean long {:.1}",
        report.summary.companies,
        report.summary.failures,
        report.summary.mean_short_term,
        report.summary.mean_long_term
    );

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn apply_flags(mut settings: EngineSettings, args: &[String]) -> Result<EngineSettings> {
    if let Some(v) = flag_value(args, "--concurrency") {
        settings.max_concurrency = v.parse().context("--concurrency expects a number")?;
    }
    if let Some(v) = flag_value(args, "--timeout-ms") {
        let ms: u64 = v.parse().context("--timeout-ms expects a number")?;
        settings.technical_timeout = Duration::from_millis(ms);
    }
    if let Some(v) = flag_value(args, "--config") {
        settings.config_path = Some(PathBuf::from(v));
    }
    if let Some(v) = flag_value(args, "--analysis-url") {
        settings.analysis_service_url = Some(v.to_string());
    }
    settings.validate()?;
    Ok(settings)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("score-batch")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = apply_flags(
            EngineSettings::default(),
            &args(&["--input", "-", "--concurrency", "3", "--timeout-ms", "900", "--analysis-url", "http://a:1"]),
        )
        .unwrap();
        assert_eq!(settings.max_concurrency, 3);
        assert_eq!(settings.technical_timeout, Duration::from_millis(900));
        assert_eq!(settings.analysis_service_url.as_deref(), Some("http://a:1"));
        assert_eq!(settings.config_path, None);
    }

    #[test]
    fn test_bad_flags_rejected() {
        assert!(apply_flags(EngineSettings::default(), &args(&["--concurrency", "many"])).is_err());
        assert!(apply_flags(EngineSettings::default(), &args(&["--concurrency", "0"])).is_err());
        assert!(apply_flags(EngineSettings::default(), &args(&["--timeout-ms", "0"])).is_err());
    }

    #[test]
    fn test_flag_value() {
        let a = args(&["--input", "in.json", "--output"]);
        assert_eq!(flag_value(&a, "--input"), Some("in.json"));
        assert_eq!(flag_value(&a, "--output"), None);
        assert_eq!(flag_value(&a, "--config"), None);
    }
}
