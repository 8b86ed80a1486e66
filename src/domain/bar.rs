//! OHLCV bar representation.
//!
//! Bars form an ordered sequence, strictly increasing in time. Gaps in the
//! calendar are the caller's concern; the engine only sees indexes.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}
