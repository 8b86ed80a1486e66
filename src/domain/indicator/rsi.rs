//! Relative Strength Index.
//!
//! Wilder's smoothing for average gain/loss:
//! - first average: simple mean of gains/losses over the first n changes
//! - thereafter: avg = (prev_avg * (n-1) + current) / n
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss); avg_loss == 0 gives 100.
//! Warmup: first n positions are NaN (n price changes are needed).

use crate::domain::bar::Bar;
use crate::domain::indicator::unavailable;

pub fn calculate_rsi(bars: &[Bar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < 2 {
        return unavailable(bars.len());
    }

    let mut values = Vec::with_capacity(bars.len());
    values.push(f64::NAN);

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        let changes = i; // number of close-to-close changes seen so far

        if changes < period {
            // still accumulating the seed mean
            avg_gain += gain;
            avg_loss += loss;
            values.push(f64::NAN);
        } else if changes == period {
            avg_gain = (avg_gain + gain) / period as f64;
            avg_loss = (avg_loss + loss) / period as f64;
            values.push(rsi_from_averages(avg_gain, avg_loss));
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
            values.push(rsi_from_averages(avg_gain, avg_loss));
        }
    }

    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
