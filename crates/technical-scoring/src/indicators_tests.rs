#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use scoring_core::PricePoint;

    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    #[test]
    fn test_recent_closes_window() {
        let points: Vec<PricePoint> = sample_prices()
            .into_iter()
            .enumerate()
            .map(|(i, c)| PricePoint::new(format!("2024-01-{:02}", i + 1), c))
            .collect();

        let last_five = recent_closes(&points, 5);
        assert_eq!(last_five, vec![46.00, 46.03, 46.41, 46.22, 45.64]);

        let all = recent_closes(&points, 50);
        assert_eq!(all.len(), 20);
        assert_eq!(all[0], 44.34);
    }

    #[test]
    fn test_trailing_mean_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((trailing_mean(&data, 3).unwrap() - 4.0).abs() < 1e-9); // (3+4+5)/3
        assert!((trailing_mean(&data, 5).unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_mean_uses_all_when_short() {
        let data = vec![2.0, 4.0];
        assert!((trailing_mean(&data, 50).unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(trailing_mean(&[], 20), None);
        assert_eq!(trailing_mean(&data, 0), None);
    }

    #[test]
    fn test_trailing_mean_real_prices() {
        let prices = sample_prices();
        let expected = prices.iter().sum::<f64>() / 20.0;
        assert!((trailing_mean(&prices, 20).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_value_back() {
        let data = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        assert_eq!(value_back(&data, 1), Some(16.0));
        assert_eq!(value_back(&data, 6), Some(11.0));
        assert_eq!(value_back(&data, 7), Some(10.0));
        assert_eq!(value_back(&data, 8), None);
        assert_eq!(value_back(&data, 0), None);
    }

    #[test]
    fn test_percent_change() {
        assert!((percent_change(100.0, 110.0) - 10.0).abs() < 1e-9);
        assert!((percent_change(200.0, 150.0) + 25.0).abs() < 1e-9);
        assert!(!percent_change(0.0, 5.0).is_finite());
        assert!(percent_change(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_highest() {
        assert_eq!(highest(&sample_prices()), Some(46.41));
        assert_eq!(highest(&[]), None);
        assert!(highest(&[1.0, f64::NAN, 3.0]).unwrap().is_nan());
    }
}
