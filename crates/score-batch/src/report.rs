use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use scoring_core::{CompanyIdentity, CompanyObservation, ScoreResult};
use scoring_orchestrator::BatchSummary;
use serde::Serialize;
use serde_json::Value;

/// One input record: either ready to score or already settled as a fallback
#[derive(Debug)]
pub enum Record {
    Decoded(CompanyObservation),
    Rejected(ScoreResult),
}

/// Parse a JSON batch. The top level must be an array (or an object with a
/// `companies` array); a record that does not decode becomes a failed result
/// in its original position instead of aborting the batch.
pub fn decode_batch(raw: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(raw).context("Input is not valid JSON")?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("companies") {
            Some(Value::Array(items)) => items,
            _ => bail!("Expected a JSON array of companies"),
        },
        _ => bail!("Expected a JSON array of companies"),
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let identity = identity_hint(&item, i);
            match CompanyObservation::from_value(item) {
                Ok(observation) => Record::Decoded(observation),
                Err(e) => {
                    tracing::error!("Record {} ({}) rejected: {}", i, identity.symbol, e);
                    Record::Rejected(ScoreResult::fallback(identity, e.to_string()))
                }
            }
        })
        .collect())
}

/// Best-effort identity of a record that failed to decode
fn identity_hint(item: &Value, index: usize) -> CompanyIdentity {
    let text = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_string);
    CompanyIdentity {
        symbol: text("symbol").unwrap_or_else(|| format!("#{}", index)),
        name: text("name"),
        sector: text("sector"),
        data_quality: item.get("dataQuality").cloned(),
    }
}

/// Observations to hand to the orchestrator, in record order
pub fn observations(records: &[Record]) -> Vec<CompanyObservation> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::Decoded(obs) => Some(obs.clone()),
            Record::Rejected(_) => None,
        })
        .collect()
}

/// Put scored results back between the rejected ones, keeping input order
pub fn assemble(records: Vec<Record>, scored: Vec<ScoreResult>) -> Vec<ScoreResult> {
    let mut scored = scored.into_iter();
    records
        .into_iter()
        .filter_map(|record| match record {
            Record::Decoded(_) => scored.next(),
            Record::Rejected(result) => Some(result),
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub summary: BatchSummary,
    pub results: Vec<ScoreResult>,
}

impl BatchReport {
    pub fn new(results: Vec<ScoreResult>) -> Self {
        Self {
            generated_at: Utc::now(),
            summary: BatchSummary::from_results(&results),
            results,
        }
    }
}
