//! Money Flow Index.
//!
//! Raw money flow = typical price * volume, classed positive or negative by
//! the typical-price change against the previous bar. Over a trailing n-bar
//! window: MFI = 100 - 100 / (1 + positive_flow / negative_flow); a zero
//! negative flow gives 100.
//! Warmup: first n positions are NaN (n typical-price changes are needed).

use crate::domain::bar::Bar;
use crate::domain::indicator::unavailable;

pub fn calculate_mfi(bars: &[Bar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < 2 {
        return unavailable(bars.len());
    }

    // Signed money flow per bar; index 0 has no prior typical price.
    let mut positive: Vec<f64> = vec![0.0; bars.len()];
    let mut negative: Vec<f64> = vec![0.0; bars.len()];
    for i in 1..bars.len() {
        let tp = bars[i].typical_price();
        let prev_tp = bars[i - 1].typical_price();
        let flow = tp * bars[i].volume as f64;
        if tp > prev_tp {
            positive[i] = flow;
        } else if tp < prev_tp {
            negative[i] = flow;
        }
    }

    (0..bars.len())
        .map(|i| {
            if i < period {
                return f64::NAN;
            }
            let window = (i - period + 1)..=i;
            let pos: f64 = window.clone().map(|j| positive[j]).sum();
            let neg: f64 = window.map(|j| negative[j]).sum();
            if neg == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + pos / neg)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(i: usize, price: f64, volume: i64) -> Bar {
        Bar {
            symbol: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }

    #[test]
    fn mfi_warmup_length() {
        let bars: Vec<Bar> = [10.0, 11.0, 12.0, 11.0, 13.0]
            .iter()
            .enumerate()
            .map(|(i, &p)| make_bar(i, p, 1000))
            .collect();
        let series = calculate_mfi(&bars, 3);
        assert!(series[2].is_nan());
        assert!(!series[3].is_nan());
    }

    #[test]
    fn mfi_all_rising_is_100() {
        let bars: Vec<Bar> = (0..6).map(|i| make_bar(i, 10.0 + i as f64, 1000)).collect();
        let series = calculate_mfi(&bars, 3);
        for v in &series[3..] {
            assert!((v - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn mfi_all_falling_is_0() {
        let bars: Vec<Bar> = (0..6).map(|i| make_bar(i, 20.0 - i as f64, 1000)).collect();
        let series = calculate_mfi(&bars, 3);
        for v in &series[3..] {
            assert!(v.abs() < 1e-9);
        }
    }

    #[test]
    fn mfi_weighs_volume() {
        // One heavy up-day dominates several light down-days.
        let bars = vec![
            make_bar(0, 10.0, 100),
            make_bar(1, 12.0, 100_000),
            make_bar(2, 11.9, 100),
            make_bar(3, 11.8, 100),
        ];
        let series = calculate_mfi(&bars, 3);
        assert!(series[3] > 90.0, "got {}", series[3]);
    }
}
