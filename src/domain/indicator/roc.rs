//! Rate of Change.
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! A zero base close yields NaN for that position, not zero.
//! Warmup: first n positions are NaN.

use crate::domain::bar::Bar;
use crate::domain::indicator::unavailable;

pub fn calculate_roc(bars: &[Bar], period: usize) -> Vec<f64> {
    if period == 0 {
        return unavailable(bars.len());
    }

    (0..bars.len())
        .map(|i| {
            if i < period {
                return f64::NAN;
            }
            let base = bars[i - period].close;
            if base == 0.0 {
                f64::NAN
            } else {
                (bars[i].close - base) / base * 100.0
            }
        })
        .collect()
}
