//! Risk overlay configuration.
//!
//! A strategy carries at most one stop-loss and at most one take-profit
//! overlay. Out-of-domain percentages never abort an evaluation: they are
//! replaced by documented defaults and each replacement is recorded so the
//! caller can log it.

pub const DEFAULT_STOP_LOSS_PCT: f64 = 5.0;
pub const DEFAULT_TAKE_PROFIT_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    Normal,
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopLoss {
    pub percent: f64,
    pub mode: StopMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TakeProfit {
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlays {
    pub stop_loss: Option<StopLoss>,
    pub take_profit: Option<TakeProfit>,
}

/// Record of a recovered-from invalid overlay parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub parameter: &'static str,
    pub supplied: f64,
    pub substituted: f64,
}

impl Overlays {
    pub fn is_empty(&self) -> bool {
        self.stop_loss.is_none() && self.take_profit.is_none()
    }

    /// Clamp out-of-domain percentages to the documented defaults.
    ///
    /// Valid domains: stop-loss in (0, 100], take-profit > 0, both finite.
    /// Returns the normalized overlays plus one record per substitution.
    pub fn normalized(&self) -> (Overlays, Vec<Substitution>) {
        let mut substitutions = Vec::new();

        let stop_loss = self.stop_loss.map(|sl| {
            if sl.percent.is_finite() && sl.percent > 0.0 && sl.percent <= 100.0 {
                sl
            } else {
                substitutions.push(Substitution {
                    parameter: "stop_loss_pct",
                    supplied: sl.percent,
                    substituted: DEFAULT_STOP_LOSS_PCT,
                });
                StopLoss {
                    percent: DEFAULT_STOP_LOSS_PCT,
                    mode: sl.mode,
                }
            }
        });

        let take_profit = self.take_profit.map(|tp| {
            if tp.percent.is_finite() && tp.percent > 0.0 {
                tp
            } else {
                substitutions.push(Substitution {
                    parameter: "take_profit_pct",
                    supplied: tp.percent,
                    substituted: DEFAULT_TAKE_PROFIT_PCT,
                });
                TakeProfit {
                    percent: DEFAULT_TAKE_PROFIT_PCT,
                }
            }
        });

        (
            Overlays {
                stop_loss,
                take_profit,
            },
            substitutions,
        )
    }
}
