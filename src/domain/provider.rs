//! Value providers and the per-run evaluation context.
//!
//! A `Provider` names a numeric source (a raw price field, a parameterized
//! indicator, or a constant) and yields one value per bar as a series
//! aligned to the bar sequence. Identity is structural: two `Provider`
//! values that compare equal always denote the same series, so the
//! evaluation context can memoize computed series under that identity and
//! predicate trees that reference the same indicator twice compute it once.
//!
//! The context is owned by a single evaluation run and dropped with it;
//! there is no process-wide cache that could leak series between strategies
//! or symbols.

use crate::domain::bar::Bar;
use crate::domain::indicator::{self, IndicatorType};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Provider {
    Field(PriceField),
    Indicator(IndicatorType),
    Constant(f64),
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Field(PriceField::Open) => write!(f, "open"),
            Provider::Field(PriceField::High) => write!(f, "high"),
            Provider::Field(PriceField::Low) => write!(f, "low"),
            Provider::Field(PriceField::Close) => write!(f, "close"),
            Provider::Field(PriceField::Volume) => write!(f, "volume"),
            Provider::Indicator(kind) => write!(f, "{kind}"),
            Provider::Constant(v) => write!(f, "{v}"),
        }
    }
}

/// Cache key for memoizable providers. Constants are excluded: they carry no
/// computation worth caching and `f64` has no total equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SeriesKey {
    Field(PriceField),
    Indicator(IndicatorType),
}

/// Per-run memoization context for provider series.
#[derive(Default)]
pub struct EvalContext {
    cache: HashMap<SeriesKey, Rc<Vec<f64>>>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct series computed so far.
    pub fn cached_series(&self) -> usize {
        self.cache.len()
    }

    /// The series for a provider over `bars`: computed on first request,
    /// shared on every later one.
    pub fn series(&mut self, provider: &Provider, bars: &[Bar]) -> Rc<Vec<f64>> {
        let key = match provider {
            Provider::Field(field) => SeriesKey::Field(*field),
            Provider::Indicator(kind) => SeriesKey::Indicator(*kind),
            Provider::Constant(v) => return Rc::new(vec![*v; bars.len()]),
        };

        if let Some(series) = self.cache.get(&key) {
            return Rc::clone(series);
        }

        let series = Rc::new(match key {
            SeriesKey::Field(field) => field_series(field, bars),
            SeriesKey::Indicator(kind) => indicator::compute(&kind, bars),
        });
        self.cache.insert(key, Rc::clone(&series));
        series
    }
}

fn field_series(field: PriceField, bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .map(|bar| match field {
            PriceField::Open => bar.open,
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
            PriceField::Close => bar.close,
            PriceField::Volume => bar.volume as f64,
        })
        .collect()
}
