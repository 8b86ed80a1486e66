//! Simple Moving Average.
//!
//! SMA(n)[i] = mean of the last n closes ending at i.
//! Warmup: first (n-1) positions are NaN.

use crate::domain::bar::Bar;
use crate::domain::indicator::unavailable;

pub fn calculate_sma(bars: &[Bar], period: usize) -> Vec<f64> {
    if period == 0 {
        return unavailable(bars.len());
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut window_sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        window_sum += bar.close;
        if i >= period {
            window_sum -= bars[i - period].close;
        }
        if i + 1 >= period {
            values.push(window_sum / period as f64);
        } else {
            values.push(f64::NAN);
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                symbol: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn sma_basic() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let series = calculate_sma(&bars, 3);
        assert_eq!(series.len(), 5);
        assert!(series[0].is_nan());
        assert!(series[1].is_nan());
        assert!((series[2] - 2.0).abs() < f64::EPSILON);
        assert!((series[3] - 3.0).abs() < f64::EPSILON);
        assert!((series[4] - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_period_one_tracks_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_sma(&bars, 1);
        assert_eq!(series, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn sma_period_longer_than_data() {
        let bars = make_bars(&[1.0, 2.0]);
        let series = calculate_sma(&bars, 5);
        assert!(series.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sma_zero_period() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let series = calculate_sma(&bars, 0);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|v| v.is_nan()));
    }
}
