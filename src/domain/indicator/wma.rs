//! Weighted Moving Average.
//!
//! WMA(n)[i] = (1*C[i-n+1] + 2*C[i-n+2] + ... + n*C[i]) / (n*(n+1)/2),
//! maintained as an O(1)-per-bar sliding window. Warmup: first (n-1)
//! positions are NaN.

use crate::domain::bar::Bar;
use crate::domain::indicator::unavailable;

pub fn calculate_wma(bars: &[Bar], period: usize) -> Vec<f64> {
    if period == 0 {
        return unavailable(bars.len());
    }

    let mut values = Vec::with_capacity(bars.len());
    let divisor = (period * (period + 1)) as f64 / 2.0;
    let mut weighted_sum: f64 = 0.0;
    let mut window_sum: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < period {
            weighted_sum += (i + 1) as f64 * bar.close;
            window_sum += bar.close;
        } else {
            weighted_sum += period as f64 * bar.close - window_sum;
            window_sum += bar.close - bars[i - period].close;
        }

        if i + 1 >= period {
            values.push(weighted_sum / divisor);
        } else {
            values.push(f64::NAN);
        }
    }

    values
}
