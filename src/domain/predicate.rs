//! Predicate AST.
//!
//! A predicate is a boolean-valued node over value providers or child
//! predicates, evaluated once per bar. The tree is a closed sum type so the
//! evaluator stays exhaustive: adding a predicate kind is a compile-checked
//! change, not a runtime dispatch surprise.

use crate::domain::provider::Provider;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntraBarBasis {
    HighLow,
    OpenClose,
}

/// The standard retracement levels, as percentages of the anchor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FibLevel {
    L0,
    L236,
    L382,
    L500,
    L618,
    L100,
}

impl FibLevel {
    /// The level as a fraction of the high/low anchor range.
    pub fn ratio(self) -> f64 {
        match self {
            FibLevel::L0 => 0.0,
            FibLevel::L236 => 0.236,
            FibLevel::L382 => 0.382,
            FibLevel::L500 => 0.5,
            FibLevel::L618 => 0.618,
            FibLevel::L100 => 1.0,
        }
    }

    /// Map a percentage written in strategy text to a level.
    pub fn from_percent(value: f64) -> Option<FibLevel> {
        let level = match value {
            v if v == 0.0 => FibLevel::L0,
            v if v == 23.6 => FibLevel::L236,
            v if v == 38.2 => FibLevel::L382,
            v if v == 50.0 => FibLevel::L500,
            v if v == 61.8 => FibLevel::L618,
            v if v == 100.0 => FibLevel::L100,
            _ => return None,
        };
        Some(level)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    GreaterThan {
        left: Provider,
        right: Provider,
    },
    LessThan {
        left: Provider,
        right: Provider,
    },
    /// True only at the exact bar where `left` flips from at-or-below to
    /// strictly above `right`.
    CrossOver {
        left: Provider,
        right: Provider,
    },
    /// True only at the exact bar where `left` flips from at-or-above to
    /// strictly below `right`.
    CrossUnder {
        left: Provider,
        right: Provider,
    },
    /// Monotone non-decreasing (up) or non-increasing (down) over the
    /// trailing `days` bars including the current one.
    Trend {
        provider: Provider,
        direction: TrendDirection,
        days: usize,
    },
    /// |percentage change over the trailing `days`-bar window| >= `percent`.
    ChangePercent {
        provider: Provider,
        percent: f64,
        days: usize,
    },
    /// The bar's own range implies a swing of at least `percent`.
    IntraBarChange {
        basis: IntraBarBasis,
        percent: f64,
    },
    /// The bar straddles the retracement trigger price for `level`, with
    /// anchors taken from the trailing `lookback`-bar high/low.
    Fibonacci {
        level: FibLevel,
        direction: TrendDirection,
        lookback: usize,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// Delays the child's signal by `days` bars.
    After {
        inner: Box<Predicate>,
        days: usize,
    },
}

impl fmt::Display for FibLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = match self {
            FibLevel::L0 => "0",
            FibLevel::L236 => "23.6",
            FibLevel::L382 => "38.2",
            FibLevel::L500 => "50",
            FibLevel::L618 => "61.8",
            FibLevel::L100 => "100",
        };
        write!(f, "{pct}")
    }
}

impl fmt::Display for Predicate {
    /// Renders the predicate in its textual form, so a parsed tree prints
    /// back as valid strategy text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::GreaterThan { left, right } => write!(f, "GT({left}, {right})"),
            Predicate::LessThan { left, right } => write!(f, "LT({left}, {right})"),
            Predicate::CrossOver { left, right } => write!(f, "CROSS_OVER({left}, {right})"),
            Predicate::CrossUnder { left, right } => write!(f, "CROSS_UNDER({left}, {right})"),
            Predicate::Trend {
                provider,
                direction,
                days,
            } => match direction {
                TrendDirection::Up => write!(f, "TREND_UP({provider}, {days})"),
                TrendDirection::Down => write!(f, "TREND_DOWN({provider}, {days})"),
            },
            Predicate::ChangePercent {
                provider,
                percent,
                days,
            } => write!(f, "CHANGE({provider}, {percent}, {days})"),
            Predicate::IntraBarChange { basis, percent } => {
                let basis = match basis {
                    IntraBarBasis::HighLow => "high_low",
                    IntraBarBasis::OpenClose => "open_close",
                };
                write!(f, "INTRABAR_CHANGE({basis}, {percent})")
            }
            Predicate::Fibonacci {
                level,
                direction,
                lookback,
            } => {
                let dir = match direction {
                    TrendDirection::Up => "up",
                    TrendDirection::Down => "down",
                };
                write!(f, "FIB({level}, {dir}, {lookback})")
            }
            Predicate::And(children) => write_variadic(f, "AND", children),
            Predicate::Or(children) => write_variadic(f, "OR", children),
            Predicate::After { inner, days } => write!(f, "AFTER({inner}, {days})"),
        }
    }
}

fn write_variadic(f: &mut fmt::Formatter<'_>, keyword: &str, children: &[Predicate]) -> fmt::Result {
    write!(f, "{keyword}(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}
