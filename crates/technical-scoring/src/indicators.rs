use scoring_core::PricePoint;

/// Closing prices of the most recent `window` points, oldest first.
pub fn recent_closes(prices: &[PricePoint], window: usize) -> Vec<f64> {
    let start = prices.len().saturating_sub(window);
    prices[start..].iter().map(|p| p.close).collect()
}

/// Mean of the last `period` values, or of all values when fewer are available.
pub fn trailing_mean(data: &[f64], period: usize) -> Option<f64> {
    if data.is_empty() || period == 0 {
        return None;
    }
    let tail = &data[data.len().saturating_sub(period)..];
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}

/// The value `points_back` positions from the end (1 = the last value).
pub fn value_back(data: &[f64], points_back: usize) -> Option<f64> {
    if points_back == 0 || points_back > data.len() {
        return None;
    }
    data.get(data.len() - points_back).copied()
}

/// Percent change from `base` to `current`. Not finite when `base` is zero.
pub fn percent_change(base: f64, current: f64) -> f64 {
    (current - base) / base * 100.0
}

/// Highest value in the slice. NaN entries propagate.
pub fn highest(data: &[f64]) -> Option<f64> {
    let mut iter = data.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, |high, v| if v.is_nan() || high.is_nan() { f64::NAN } else { high.max(v) }))
}
