//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first n-bar SMA, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Warmup: first (n-1) positions are NaN.

use crate::domain::bar::Bar;
use crate::domain::indicator::unavailable;

pub fn calculate_ema(bars: &[Bar], period: usize) -> Vec<f64> {
    if period == 0 {
        return unavailable(bars.len());
    }

    let mut values = Vec::with_capacity(bars.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut seed_sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < period - 1 {
            seed_sum += bar.close;
            values.push(f64::NAN);
        } else if i == period - 1 {
            seed_sum += bar.close;
            ema = seed_sum / period as f64;
            values.push(ema);
        } else {
            ema = bar.close * k + ema * (1.0 - k);
            values.push(ema);
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
    fn ema_seed_is_sma() {
        let bars = make_bars(&[2.0, 4.0, 6.0, 8.0]);
        let series = calculate_ema(&bars, 3);
        assert!(series[0].is_nan());
        assert!(series[1].is_nan());
        // seed = (2+4+6)/3 = 4
        assert!((series[2] - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursion() {
        let bars = make_bars(&[2.0, 4.0, 6.0, 8.0]);
        let series = calculate_ema(&bars, 3);
        let k = 2.0 / 4.0;
        let expected = 8.0 * k + 4.0 * (1.0 - k);
        assert!((series[3] - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_constant_prices() {
        let bars = make_bars(&[50.0; 10]);
        let series = calculate_ema(&bars, 4);
        for v in &series[3..] {
            assert!((v - 50.0).abs() < 1e-12);
        }
    }
}
