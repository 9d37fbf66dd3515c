use scoring_core::{clamp_score, or_neutral, PricePoint, ScoringConfig, ScoringError, TechnicalRules};
use serde::Serialize;

use crate::indicators::*;

/// Where the current price sits relative to its moving averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    /// price > MA20 > MA50
    StrongUptrend,
    AboveShortAverage,
    AboveLongAverage,
    Downtrend,
}

/// Every intermediate value behind a technical score
#[derive(Debug, Clone, Serialize)]
pub struct TechnicalBreakdown {
    pub current_price: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub week_return: f64,
    pub month_return: f64,
    pub percent_from_high: f64,
    pub trend: Trend,
    pub trend_points: i32,
    pub return_points: i32,
    pub high_points: i32,
    pub score: u8,
}

/// Momentum/trend strength from a close series
#[derive(Debug, Clone)]
pub struct TechnicalScorer {
    rules: TechnicalRules,
    base_score: i32,
}

impl TechnicalScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            rules: config.technical.clone(),
            base_score: config.base_score,
        }
    }

    pub fn score(&self, prices: &[PricePoint]) -> u8 {
        or_neutral(self.evaluate_prices(prices))
    }

    pub fn evaluate_prices(&self, prices: &[PricePoint]) -> Result<u8, ScoringError> {
        self.analyze(prices).map(|b| b.score)
    }

    pub fn analyze(&self, prices: &[PricePoint]) -> Result<TechnicalBreakdown, ScoringError> {
        let rules = &self.rules;
        if prices.len() < rules.min_history {
            return Err(ScoringError::InsufficientData(format!(
                "Need at least {} closes, got {}",
                rules.min_history,
                prices.len()
            )));
        }

        let closes = recent_closes(prices, rules.window);
        if let Some(bad) = closes.iter().position(|c| !c.is_finite()) {
            return Err(ScoringError::InvalidData(format!(
                "Non-numeric close at position {} of the last {}",
                bad,
                closes.len()
            )));
        }

        let current_price = *closes
            .last()
            .ok_or_else(|| ScoringError::InsufficientData("Empty price window".to_string()))?;
        let ma_short = trailing_mean(&closes, rules.short_ma_period).unwrap_or(f64::NAN);
        let ma_long = trailing_mean(&closes, rules.window).unwrap_or(f64::NAN);

        let (trend, trend_points) = if current_price > ma_short && ma_short > ma_long {
            (Trend::StrongUptrend, rules.strong_uptrend_points)
        } else if current_price > ma_short {
            (Trend::AboveShortAverage, rules.above_short_ma_points)
        } else if current_price > ma_long {
            (Trend::AboveLongAverage, rules.above_long_ma_points)
        } else {
            (Trend::Downtrend, rules.downtrend_points)
        };

        let week_ago = value_back(&closes, rules.week_lookback).unwrap_or(current_price);
        let month_ago = value_back(&closes, rules.month_lookback).unwrap_or(current_price);
        let week_return = percent_change(week_ago, current_price);
        let month_return = percent_change(month_ago, current_price);
        let return_points = rules.week_return.points(week_return) + rules.month_return.points(month_return);

        let high = highest(&closes).unwrap_or(f64::NAN);
        let percent_from_high = percent_change(high, current_price);
        let high_points = rules.from_high.points(percent_from_high);

        let derived = [
            ("moving average", ma_short),
            ("moving average", ma_long),
            ("week return", week_return),
            ("month return", month_return),
            ("distance from high", percent_from_high),
        ];
        if let Some((what, value)) = derived.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScoringError::CalculationError(format!(
                "{} is not finite ({})",
                what, value
            )));
        }

        let score = clamp_score(self.base_score + trend_points + return_points + high_points);

        Ok(TechnicalBreakdown {
            current_price,
            ma_short,
            ma_long,
            week_return,
            month_return,
            percent_from_high,
            trend,
            trend_points,
            return_points,
            high_points,
            score,
        })
    }
}

impl Default for TechnicalScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(format!("day-{:03}", i), c))
            .collect()
    }

    #[test]
    fn test_short_history_is_neutral() {
        let prices = series(&[100.0; 19]);
        let scorer = TechnicalScorer::default();
        assert!(matches!(
            scorer.evaluate_prices(&prices),
            Err(ScoringError::InsufficientData(_))
        ));
        assert_eq!(scorer.score(&prices), 50);
        assert_eq!(scorer.score(&[]), 50);
    }

    #[test]
    fn test_rising_series_at_high() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let breakdown = TechnicalScorer::default().analyze(&series(&closes)).unwrap();

        assert_eq!(breakdown.trend, Trend::StrongUptrend);
        assert!((breakdown.ma_short - 149.5).abs() < 1e-9);
        assert!((breakdown.ma_long - 134.5).abs() < 1e-9);
        // 159 vs 154 and 159 vs 139
        assert_eq!(breakdown.return_points, 10 + 15);
        assert_eq!(breakdown.high_points, 20);
        assert_eq!(breakdown.score, 100);
    }

    #[test]
    fn test_falling_series() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let breakdown = TechnicalScorer::default().analyze(&series(&closes)).unwrap();

        assert_eq!(breakdown.trend, Trend::Downtrend);
        // week -3.4% scores nothing, month -12.4% and -25.8% off the high both penalize
        assert_eq!(breakdown.return_points, -10);
        assert_eq!(breakdown.high_points, -15);
        assert_eq!(breakdown.score, 5);
    }

    #[test]
    fn test_flat_series() {
        let breakdown = TechnicalScorer::default().analyze(&series(&[100.0; 30])).unwrap();
        assert_eq!(breakdown.trend, Trend::Downtrend);
        assert_eq!(breakdown.return_points, 0);
        assert_eq!(breakdown.high_points, 20);
        assert_eq!(breakdown.score, 50);
    }

    #[test]
    fn test_minimum_history_without_month_lookback() {
        let mut closes = vec![100.0; 19];
        closes.push(103.0);
        let breakdown = TechnicalScorer::default().analyze(&series(&closes)).unwrap();

        // Fewer than 50 closes: both averages cover the same 20 points
        assert_eq!(breakdown.ma_short, breakdown.ma_long);
        assert_eq!(breakdown.trend, Trend::AboveShortAverage);
        assert_eq!(breakdown.month_return, 0.0);
        assert_eq!(breakdown.score, 50 + 15 + 10 + 20);
    }

    #[test]
    fn test_zero_price_is_a_calculation_fault() {
        let mut closes = vec![100.0; 25];
        closes[19] = 0.0;
        let result = TechnicalScorer::default().evaluate_prices(&series(&closes));
        assert!(matches!(result, Err(ScoringError::CalculationError(_))));
        assert_eq!(TechnicalScorer::default().score(&series(&closes)), 50);
    }

    #[test]
    fn test_all_zero_prices_fault() {
        let result = TechnicalScorer::default().evaluate_prices(&series(&[0.0; 30]));
        assert!(matches!(result, Err(ScoringError::CalculationError(_))));
    }

    #[test]
    fn test_nan_close_is_invalid() {
        let mut closes: Vec<f64> = (0..40).map(|i| 50.0 + i as f64).collect();
        closes[35] = f64::NAN;
        let result = TechnicalScorer::default().evaluate_prices(&series(&closes));
        assert!(matches!(result, Err(ScoringError::InvalidData(_))));
    }

    #[test]
    fn test_nan_outside_window_is_ignored() {
        let mut closes: Vec<f64> = (0..70).map(|i| 100.0 + i as f64).collect();
        closes[5] = f64::NAN;
        assert_eq!(TechnicalScorer::default().evaluate_prices(&series(&closes)), Ok(100));
    }
}
