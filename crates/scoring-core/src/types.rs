use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::lenient;
use crate::{ScoringError, NEUTRAL_SCORE};

/// One daily close. `date` is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: impl Into<String>, close: f64) -> Self {
        Self {
            date: Some(date.into()),
            close,
        }
    }

    /// Decode one entry of a price series. Accepts a bare number, a numeric
    /// string, or an object carrying `close`, `price` or `value`. Anything
    /// unreadable becomes a NaN close so the technical factor faults for
    /// this company only.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let date = map.get("date").and_then(|d| match d {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                });
                let close = ["close", "price", "value"]
                    .iter()
                    .find_map(|key| map.get(*key))
                    .and_then(lenient::number_from_value)
                    .unwrap_or(f64::NAN);
                Self { date, close }
            }
            other => Self {
                date: None,
                close: lenient::number_from_value(other).unwrap_or(f64::NAN),
            },
        }
    }
}

impl<'de> Deserialize<'de> for PricePoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(PricePoint::from_value(&value))
    }
}

/// Most-recent-period fractional growth rates (0.20 = 20%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMetrics {
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub revenue_growth: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub net_income_growth: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub free_cash_flow_growth: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestQuote {
    /// Daily change in percent (5.0 = +5%)
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRatios {
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub price_earnings_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub price_to_book_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub enterprise_value_multiple: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub price_to_sales_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityRatios {
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub return_on_equity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub debt_equity_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub current_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    pub net_profit_margin: Option<f64>,
}

/// Per-company input for one scoring run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyObservation {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    /// Chronological, oldest first
    #[serde(default, deserialize_with = "lenient::price_series")]
    pub historical_prices: Vec<PricePoint>,
    #[serde(default, deserialize_with = "lenient::optional_group")]
    pub growth_metrics: Option<GrowthMetrics>,
    #[serde(default, deserialize_with = "lenient::optional_group")]
    pub latest_quote: Option<LatestQuote>,
    #[serde(default, deserialize_with = "lenient::optional_group")]
    pub valuation_ratios: Option<ValuationRatios>,
    #[serde(default, deserialize_with = "lenient::optional_group")]
    pub quality_ratios: Option<QualityRatios>,
    /// Opaque upstream metadata, copied into the result
    #[serde(default)]
    pub data_quality: Option<Value>,
}

impl CompanyObservation {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Decode a single record of an upstream batch.
    pub fn from_value(value: Value) -> Result<Self, ScoringError> {
        serde_json::from_value(value).map_err(|e| ScoringError::InvalidData(e.to_string()))
    }

    pub fn identity(&self) -> CompanyIdentity {
        CompanyIdentity {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            sector: self.sector.clone(),
            data_quality: self.data_quality.clone(),
        }
    }
}

/// The pass-through part of an observation, kept aside so a result can
/// still be produced when the company's pipeline fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyIdentity {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub data_quality: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubFactor {
    Technical,
    Momentum,
    Valuation,
    Fundamental,
}

impl SubFactor {
    pub const ALL: [SubFactor; 4] = [
        SubFactor::Technical,
        SubFactor::Momentum,
        SubFactor::Valuation,
        SubFactor::Fundamental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubFactor::Technical => "technical",
            SubFactor::Momentum => "momentum",
            SubFactor::Valuation => "valuation",
            SubFactor::Fundamental => "fundamental",
        }
    }
}

impl fmt::Display for SubFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four sub-scores, exposed for auditing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub technical: u8,
    pub momentum: u8,
    pub valuation: u8,
    pub fundamental: u8,
}

impl ScoreComponents {
    pub fn neutral() -> Self {
        Self {
            technical: NEUTRAL_SCORE,
            momentum: NEUTRAL_SCORE,
            valuation: NEUTRAL_SCORE,
            fundamental: NEUTRAL_SCORE,
        }
    }

    pub fn get(&self, factor: SubFactor) -> u8 {
        match factor {
            SubFactor::Technical => self.technical,
            SubFactor::Momentum => self.momentum,
            SubFactor::Valuation => self.valuation,
            SubFactor::Fundamental => self.fundamental,
        }
    }

    pub fn set(&mut self, factor: SubFactor, score: u8) {
        let slot = match factor {
            SubFactor::Technical => &mut self.technical,
            SubFactor::Momentum => &mut self.momentum,
            SubFactor::Valuation => &mut self.valuation,
            SubFactor::Fundamental => &mut self.fundamental,
        };
        *slot = score;
    }
}

impl Default for ScoreComponents {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Per-company output of a scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub short_term_score: u8,
    pub long_term_score: u8,
    pub components: ScoreComponents,
    pub data_quality: Option<Value>,
    /// Set only when the whole company pipeline failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoreResult {
    pub fn new(
        identity: CompanyIdentity,
        components: ScoreComponents,
        short_term_score: u8,
        long_term_score: u8,
    ) -> Self {
        Self {
            symbol: identity.symbol,
            name: identity.name,
            sector: identity.sector,
            short_term_score,
            long_term_score,
            components,
            data_quality: identity.data_quality,
            error: None,
        }
    }

    /// All-neutral result for a company whose pipeline failed.
    pub fn fallback(identity: CompanyIdentity, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(identity, ScoreComponents::neutral(), NEUTRAL_SCORE, NEUTRAL_SCORE)
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
