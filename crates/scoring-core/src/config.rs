//! Scoring thresholds and weights.
//!
//! Every point value and cut-off used by the four scorers and the composite
//! lives here as data. `Default` reproduces the production table; alternate
//! tables can be loaded from JSON for experiments and tests.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ScoringError;

/// One threshold and the points awarded when it is crossed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rung {
    pub bound: f64,
    pub points: i32,
}

/// An ordered rule table.
///
/// `above` rungs are tried first (value strictly greater than the bound,
/// first match wins), then `below` rungs (value strictly less than the
/// bound, first match wins). If nothing matches, `otherwise` applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLadder {
    pub above: Vec<Rung>,
    pub below: Vec<Rung>,
    pub otherwise: i32,
}

impl PointLadder {
    pub fn new(above: &[(f64, i32)], below: &[(f64, i32)], otherwise: i32) -> Self {
        let rungs = |pairs: &[(f64, i32)]| {
            pairs
                .iter()
                .map(|&(bound, points)| Rung { bound, points })
                .collect()
        };
        Self {
            above: rungs(above),
            below: rungs(below),
            otherwise,
        }
    }

    pub fn points(&self, value: f64) -> i32 {
        self.above
            .iter()
            .find(|r| value > r.bound)
            .or_else(|| self.below.iter().find(|r| value < r.bound))
            .map_or(self.otherwise, |r| r.points)
    }

    /// `above` bounds must descend and `below` bounds ascend, otherwise later
    /// rungs can never fire. Bounds must be finite.
    pub fn is_well_formed(&self) -> bool {
        let finite = self
            .above
            .iter()
            .chain(self.below.iter())
            .all(|r| r.bound.is_finite());
        let above_desc = self.above.windows(2).all(|w| w[0].bound > w[1].bound);
        let below_asc = self.below.windows(2).all(|w| w[0].bound < w[1].bound);
        finite && above_desc && below_asc
    }
}

/// Price-trend, short-term return and distance-from-high rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalRules {
    /// Fewer closes than this resolves to the neutral score
    pub min_history: usize,
    /// Number of most recent closes considered
    pub window: usize,
    pub short_ma_period: usize,
    pub week_lookback: usize,
    pub month_lookback: usize,
    /// price > MA20 > MA50
    pub strong_uptrend_points: i32,
    /// price > MA20
    pub above_short_ma_points: i32,
    /// price > MA50
    pub above_long_ma_points: i32,
    pub downtrend_points: i32,
    /// Percent change vs `week_lookback` closes back
    pub week_return: PointLadder,
    /// Percent change vs `month_lookback` closes back
    pub month_return: PointLadder,
    /// Percent below the window high
    pub from_high: PointLadder,
}

impl Default for TechnicalRules {
    fn default() -> Self {
        Self {
            min_history: 20,
            window: 50,
            short_ma_period: 20,
            week_lookback: 6,
            month_lookback: 21,
            strong_uptrend_points: 25,
            above_short_ma_points: 15,
            above_long_ma_points: 5,
            downtrend_points: -20,
            week_return: PointLadder::new(&[(5.0, 20), (2.0, 10)], &[(-5.0, -15)], 0),
            month_return: PointLadder::new(&[(10.0, 15), (5.0, 8)], &[(-10.0, -10)], 0),
            from_high: PointLadder::new(&[(-2.0, 20), (-5.0, 10)], &[(-20.0, -15)], 0),
        }
    }
}

/// Growth-rate and daily-change rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumRules {
    pub revenue_growth: PointLadder,
    pub net_income_growth: PointLadder,
    pub free_cash_flow_growth: PointLadder,
    pub change_percent: PointLadder,
}

impl Default for MomentumRules {
    fn default() -> Self {
        Self {
            revenue_growth: PointLadder::new(&[(0.20, 25), (0.10, 15), (0.05, 8)], &[(-0.05, -20)], 0),
            net_income_growth: PointLadder::new(&[(0.25, 25), (0.15, 15), (0.10, 8)], &[(-0.10, -20)], 0),
            free_cash_flow_growth: PointLadder::new(&[(0.20, 15), (0.10, 8)], &[(-0.15, -10)], 0),
            change_percent: PointLadder::new(&[(10.0, 15), (5.0, 8)], &[(-10.0, -15)], 0),
        }
    }
}

/// Multiple rules. Cheaper scores higher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationRules {
    pub price_earnings: PointLadder,
    pub price_to_book: PointLadder,
    pub enterprise_value_multiple: PointLadder,
    pub price_to_sales: PointLadder,
}

impl Default for ValuationRules {
    fn default() -> Self {
        Self {
            price_earnings: PointLadder::new(&[], &[(12.0, 20), (18.0, 10), (25.0, -5), (35.0, -15)], -25),
            price_to_book: PointLadder::new(&[], &[(1.5, 15), (3.0, 5), (5.0, -10)], -20),
            enterprise_value_multiple: PointLadder::new(&[], &[(8.0, 15), (12.0, 8), (18.0, -5)], -15),
            price_to_sales: PointLadder::new(&[], &[(1.5, 10), (3.0, 5), (6.0, -8)], -15),
        }
    }
}

/// Profitability, leverage and liquidity rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityRules {
    pub return_on_equity: PointLadder,
    pub debt_to_equity: PointLadder,
    pub current_ratio: PointLadder,
    pub net_margin: PointLadder,
}

impl Default for QualityRules {
    fn default() -> Self {
        Self {
            return_on_equity: PointLadder::new(&[(0.25, 25), (0.18, 18), (0.12, 12), (0.08, 5)], &[], -10),
            debt_to_equity: PointLadder::new(&[], &[(0.2, 20), (0.4, 15), (0.6, 10), (1.0, 0), (2.0, -10)], -20),
            current_ratio: PointLadder::new(&[(2.5, 15), (2.0, 12), (1.5, 10), (1.2, 5), (1.0, -5)], &[], -15),
            net_margin: PointLadder::new(&[(0.20, 20), (0.15, 15), (0.10, 10), (0.05, 5)], &[], -10),
        }
    }
}

/// Blend weights for the two composite horizons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    pub technical: f64,
    pub momentum: f64,
    pub valuation: f64,
    pub fundamental: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            technical: 0.6,
            momentum: 0.4,
            valuation: 0.6,
            fundamental: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Starting point every additive scorer builds on
    pub base_score: i32,
    pub technical: TechnicalRules,
    pub momentum: MomentumRules,
    pub valuation: ValuationRules,
    pub quality: QualityRules,
    pub weights: CompositeWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 50,
            technical: TechnicalRules::default(),
            momentum: MomentumRules::default(),
            valuation: ValuationRules::default(),
            quality: QualityRules::default(),
            weights: CompositeWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// Load an alternate table. Missing keys keep their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScoringError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ScoringError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ScoringError> {
        let config: ScoringConfig =
            serde_json::from_str(raw).map_err(|e| ScoringError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(0..=100).contains(&self.base_score) {
            return Err(ScoringError::InvalidConfig(format!(
                "base_score {} outside 0..=100",
                self.base_score
            )));
        }

        let w = &self.weights;
        let weights = [
            ("technical", w.technical),
            ("momentum", w.momentum),
            ("valuation", w.valuation),
            ("fundamental", w.fundamental),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidConfig(format!(
                    "weight {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if w.technical + w.momentum <= 0.0 || w.valuation + w.fundamental <= 0.0 {
            return Err(ScoringError::InvalidConfig(
                "each horizon needs a positive total weight".to_string(),
            ));
        }

        let t = &self.technical;
        if t.short_ma_period == 0 || t.min_history < t.short_ma_period || t.window < t.min_history {
            return Err(ScoringError::InvalidConfig(format!(
                "technical periods must satisfy 0 < short_ma_period ({}) <= min_history ({}) <= window ({})",
                t.short_ma_period, t.min_history, t.window
            )));
        }

        let ladders = [
            ("technical.week_return", &t.week_return),
            ("technical.month_return", &t.month_return),
            ("technical.from_high", &t.from_high),
            ("momentum.revenue_growth", &self.momentum.revenue_growth),
            ("momentum.net_income_growth", &self.momentum.net_income_growth),
            ("momentum.free_cash_flow_growth", &self.momentum.free_cash_flow_growth),
            ("momentum.change_percent", &self.momentum.change_percent),
            ("valuation.price_earnings", &self.valuation.price_earnings),
            ("valuation.price_to_book", &self.valuation.price_to_book),
            ("valuation.enterprise_value_multiple", &self.valuation.enterprise_value_multiple),
            ("valuation.price_to_sales", &self.valuation.price_to_sales),
            ("quality.return_on_equity", &self.quality.return_on_equity),
            ("quality.debt_to_equity", &self.quality.debt_to_equity),
            ("quality.current_ratio", &self.quality.current_ratio),
            ("quality.net_margin", &self.quality.net_margin),
        ];
        if let Some((name, _)) = ladders.iter().find(|(_, ladder)| !ladder.is_well_formed()) {
            return Err(ScoringError::InvalidConfig(format!(
                "{} has unreachable or non-finite rungs",
                name
            )));
        }

        Ok(())
    }
}
