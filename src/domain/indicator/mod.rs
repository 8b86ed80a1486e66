//! Technical indicator implementations.
//!
//! Each indicator is a pure function from a bar slice to a numeric series
//! aligned to it: one `f64` per bar, with `f64::NAN` marking warm-up
//! positions where the value is not yet defined. The engine treats NaN as
//! "not available" and never as zero.
//!
//! `IndicatorType` is the identity of a computed series: variant plus
//! parameters. Equal identities always denote the same series, which is what
//! makes it usable as the memoization key in the evaluation context.

pub mod ema;
pub mod mfi;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod wma;

use crate::domain::bar::Bar;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Wma(usize),
    Rsi(usize),
    Roc(usize),
    Mfi(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Wma(period) => write!(f, "WMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Roc(period) => write!(f, "ROC({})", period),
            IndicatorType::Mfi(period) => write!(f, "MFI({})", period),
        }
    }
}

/// Compute the series for an indicator identity over a bar sequence.
///
/// Deterministic and side-effect free. A zero period yields an all-NaN
/// series of the right length rather than an error; the predicate layer
/// degrades such a series to all-false.
pub fn compute(kind: &IndicatorType, bars: &[Bar]) -> Vec<f64> {
    match *kind {
        IndicatorType::Sma(period) => sma::calculate_sma(bars, period),
        IndicatorType::Ema(period) => ema::calculate_ema(bars, period),
        IndicatorType::Wma(period) => wma::calculate_wma(bars, period),
        IndicatorType::Rsi(period) => rsi::calculate_rsi(bars, period),
        IndicatorType::Roc(period) => roc::calculate_roc(bars, period),
        IndicatorType::Mfi(period) => mfi::calculate_mfi(bars, period),
    }
}

/// An all-NaN series aligned to the bar sequence.
pub(crate) fn unavailable(len: usize) -> Vec<f64> {
    vec![f64::NAN; len]
}
