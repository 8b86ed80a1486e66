//! Strategy definition and top-level evaluation.

use crate::domain::bar::Bar;
use crate::domain::overlay::{Overlays, Substitution};
use crate::domain::predicate::Predicate;
use crate::domain::predicate_eval;
use crate::domain::provider::EvalContext;
use crate::domain::signal::{self, ResolvedSignals};

#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: String,
    pub description: String,
    pub buy: Predicate,
    pub sell: Predicate,
    pub overlays: Overlays,
}

/// Output of one strategy evaluation: final signal sequences plus the
/// overlay-parameter substitutions made along the way, for the caller to log.
#[derive(Debug, Clone)]
pub struct StrategySignals {
    pub buy: Vec<bool>,
    pub sell: Vec<bool>,
    pub substitutions: Vec<Substitution>,
}

/// Evaluate a strategy over a bar sequence.
///
/// Pure: one evaluation context per call, so indicator series shared between
/// the buy and sell trees are computed once and nothing leaks across calls.
pub fn evaluate_strategy(strategy: &Strategy, bars: &[Bar]) -> StrategySignals {
    let mut ctx = EvalContext::new();
    let raw_buy = predicate_eval::evaluate(&strategy.buy, bars, &mut ctx);
    let raw_sell = predicate_eval::evaluate(&strategy.sell, bars, &mut ctx);

    let (overlays, substitutions) = strategy.overlays.normalized();
    let ResolvedSignals { buy, sell } = signal::resolve(bars, &raw_buy, &raw_sell, &overlays);

    StrategySignals {
        buy,
        sell,
        substitutions,
    }
}
