//! Tolerant decoders for upstream records.
//!
//! Provider payloads are normalized upstream, but numbers still show up as
//! strings, groups show up as `null` or `[]`, and price series arrive in a
//! few shapes. None of that may fail a whole batch decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::PricePoint;

/// Read a JSON number or numeric string. Non-finite results count as absent.
pub fn number_from_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

/// A group that is not a JSON object, or does not decode, is treated as missing.
pub fn optional_group<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

/// Accepts an array of points/numbers, or an object wrapping one under
/// `prices` or `price_data`. Anything else is an empty series.
pub fn price_series<'de, D>(deserializer: D) -> Result<Vec<PricePoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(series_from_value(&value))
}

fn series_from_value(value: &Value) -> Vec<PricePoint> {
    match value {
        Value::Array(items) => items.iter().map(PricePoint::from_value).collect(),
        Value::Object(map) => map
            .get("prices")
            .or_else(|| map.get("price_data"))
            .map(series_from_value)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(1.5)), Some(1.5));
        assert_eq!(number_from_value(&json!(" 2.25 ")), Some(2.25));
        assert_eq!(number_from_value(&json!("NaN")), None);
        assert_eq!(number_from_value(&json!("inf")), None);
        assert_eq!(number_from_value(&json!(null)), None);
        assert_eq!(number_from_value(&json!({"v": 1})), None);
    }
}
