//! Predicate evaluation engine.
//!
//! Every node evaluates to a boolean sequence exactly aligned to the bar
//! sequence. Evaluation is bottom-up: composites evaluate all children
//! first, then combine bar-wise. AND/OR are strict, with no short-circuit,
//! since each child's full sequence is produced anyway.
//!
//! # Unavailability
//!
//! A provider position holding NaN cannot assert any comparison, so it
//! evaluates to `false` for that bar, never an error. Crossovers need two
//! consecutive available values on both sides; trend and windowed-change
//! predicates need the whole window. Malformed parameters (a zero window, a
//! non-finite percentage) degrade that node to an all-false sequence,
//! isolated to its subtree.

use crate::domain::bar::Bar;
use crate::domain::predicate::{FibLevel, IntraBarBasis, Predicate, TrendDirection};
use crate::domain::provider::{EvalContext, Provider};

pub fn evaluate(predicate: &Predicate, bars: &[Bar], ctx: &mut EvalContext) -> Vec<bool> {
    match predicate {
        Predicate::GreaterThan { left, right } => {
            compare(left, right, bars, ctx, |l, r| l > r)
        }
        Predicate::LessThan { left, right } => {
            compare(left, right, bars, ctx, |l, r| l < r)
        }
        Predicate::CrossOver { left, right } => {
            cross(left, right, bars, ctx, |lp, rp, lc, rc| lp <= rp && lc > rc)
        }
        Predicate::CrossUnder { left, right } => {
            cross(left, right, bars, ctx, |lp, rp, lc, rc| lp >= rp && lc < rc)
        }
        Predicate::Trend {
            provider,
            direction,
            days,
        } => trend(provider, *direction, *days, bars, ctx),
        Predicate::ChangePercent {
            provider,
            percent,
            days,
        } => change_percent(provider, *percent, *days, bars, ctx),
        Predicate::IntraBarChange { basis, percent } => intra_bar_change(*basis, *percent, bars),
        Predicate::Fibonacci {
            level,
            direction,
            lookback,
        } => fibonacci(*level, *direction, *lookback, bars),
        Predicate::And(children) => combine(children, bars, ctx, true, |acc, v| acc && v),
        Predicate::Or(children) => combine(children, bars, ctx, false, |acc, v| acc || v),
        Predicate::After { inner, days } => {
            let child = evaluate(inner, bars, ctx);
            (0..bars.len())
                .map(|i| i >= *days && child[i - *days])
                .collect()
        }
    }
}

fn available(v: f64) -> bool {
    v.is_finite()
}

fn compare(
    left: &Provider,
    right: &Provider,
    bars: &[Bar],
    ctx: &mut EvalContext,
    cmp: impl Fn(f64, f64) -> bool,
) -> Vec<bool> {
    let lhs = ctx.series(left, bars);
    let rhs = ctx.series(right, bars);
    lhs.iter()
        .zip(rhs.iter())
        .map(|(&l, &r)| available(l) && available(r) && cmp(l, r))
        .collect()
}

fn cross(
    left: &Provider,
    right: &Provider,
    bars: &[Bar],
    ctx: &mut EvalContext,
    flip: impl Fn(f64, f64, f64, f64) -> bool,
) -> Vec<bool> {
    let lhs = ctx.series(left, bars);
    let rhs = ctx.series(right, bars);
    (0..bars.len())
        .map(|i| {
            if i == 0 {
                return false;
            }
            let (lp, rp, lc, rc) = (lhs[i - 1], rhs[i - 1], lhs[i], rhs[i]);
            [lp, rp, lc, rc].iter().all(|&v| available(v)) && flip(lp, rp, lc, rc)
        })
        .collect()
}

fn trend(
    provider: &Provider,
    direction: TrendDirection,
    days: usize,
    bars: &[Bar],
    ctx: &mut EvalContext,
) -> Vec<bool> {
    if days == 0 {
        return vec![false; bars.len()];
    }
    let series = ctx.series(provider, bars);
    (0..bars.len())
        .map(|i| {
            if i + 1 < days {
                return false;
            }
            let window = &series[i + 1 - days..=i];
            if window.iter().any(|&v| !available(v)) {
                return false;
            }
            window.windows(2).all(|pair| match direction {
                TrendDirection::Up => pair[1] >= pair[0],
                TrendDirection::Down => pair[1] <= pair[0],
            })
        })
        .collect()
}

fn change_percent(
    provider: &Provider,
    percent: f64,
    days: usize,
    bars: &[Bar],
    ctx: &mut EvalContext,
) -> Vec<bool> {
    if days == 0 || !percent.is_finite() {
        return vec![false; bars.len()];
    }
    let series = ctx.series(provider, bars);
    (0..bars.len())
        .map(|i| {
            if i < days {
                return false;
            }
            let base = series[i - days];
            let current = series[i];
            if !available(base) || !available(current) || base == 0.0 {
                return false;
            }
            ((current - base) / base * 100.0).abs() >= percent
        })
        .collect()
}

fn intra_bar_change(basis: IntraBarBasis, percent: f64, bars: &[Bar]) -> Vec<bool> {
    if !percent.is_finite() {
        return vec![false; bars.len()];
    }
    bars.iter()
        .map(|bar| {
            let (base, span) = match basis {
                IntraBarBasis::HighLow => (bar.low, bar.high - bar.low),
                IntraBarBasis::OpenClose => (bar.open, (bar.close - bar.open).abs()),
            };
            if !available(base) || base == 0.0 {
                return false;
            }
            (span / base * 100.0).abs() >= percent
        })
        .collect()
}

/// Retracement membership: the trigger price for `level` is computed from
/// the trailing-window low/high anchors (window includes the current bar),
/// measured from the low upward for an uptrend and from the high downward
/// for a downtrend. A bar is "in" the level when the trigger price falls
/// within [bar.low, bar.high] inclusive.
fn fibonacci(level: FibLevel, direction: TrendDirection, lookback: usize, bars: &[Bar]) -> Vec<bool> {
    if lookback == 0 {
        return vec![false; bars.len()];
    }
    (0..bars.len())
        .map(|i| {
            if i + 1 < lookback {
                return false;
            }
            let window = &bars[i + 1 - lookback..=i];
            let anchor_high = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let anchor_low = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            let range = anchor_high - anchor_low;
            let trigger = match direction {
                TrendDirection::Up => anchor_low + level.ratio() * range,
                TrendDirection::Down => anchor_high - level.ratio() * range,
            };
            bars[i].low <= trigger && trigger <= bars[i].high
        })
        .collect()
}

fn combine(
    children: &[Predicate],
    bars: &[Bar],
    ctx: &mut EvalContext,
    identity: bool,
    fold: impl Fn(bool, bool) -> bool,
) -> Vec<bool> {
    // Strict: every child sequence is materialized before combining.
    let sequences: Vec<Vec<bool>> = children
        .iter()
        .map(|child| evaluate(child, bars, ctx))
        .collect();
    (0..bars.len())
        .map(|i| sequences.iter().fold(identity, |acc, seq| fold(acc, seq[i])))
        .collect()
}
