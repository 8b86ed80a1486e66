//! Signal resolution state machine.
//!
//! Turns the raw per-bar BUY/SELL sequences produced by the predicate trees,
//! plus the configured risk overlays, into final sequences that respect a
//! single position lifecycle: FLAT -> LONG -> FLAT, never LONG while already
//! LONG. The scan is strictly sequential, since each bar's outcome depends on
//! the position state accumulated over all earlier bars, and is written as a
//! fold over fresh output vectors, never as in-place rewriting of the raw
//! sequences.
//!
//! # Exit rules
//!
//! While long, the first matching rule per bar wins:
//! 1. the raw sell tree fired;
//! 2. stop-loss: close at or below the trigger price, fixed at entry for
//!    `Normal`, ratcheted off the running close extreme for `Trailing`
//!    (the trigger never moves against the position);
//! 3. take-profit: close at or above the fixed target.
//!
//! An overlay-triggered exit closes the position at the trigger bar. A later
//! BUY then opens a fresh position at its own close. A SELL while flat is
//! dropped, and a BUY while long is ignored without touching the original
//! entry price. Both overlays run in this one shared scan; they are never
//! applied as two independent passes over the same raw sequences.

use crate::domain::bar::Bar;
use crate::domain::overlay::{Overlays, StopMode};

/// Final, internally consistent entry/exit sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSignals {
    pub buy: Vec<bool>,
    pub sell: Vec<bool>,
}

#[derive(Debug, Clone, Copy)]
enum Position {
    Flat,
    Long { entry_price: f64, extreme: f64 },
}

pub fn resolve(
    bars: &[Bar],
    raw_buy: &[bool],
    raw_sell: &[bool],
    overlays: &Overlays,
) -> ResolvedSignals {
    debug_assert_eq!(bars.len(), raw_buy.len());
    debug_assert_eq!(bars.len(), raw_sell.len());

    let mut buy = vec![false; bars.len()];
    let mut sell = vec![false; bars.len()];
    let mut position = Position::Flat;

    for (i, bar) in bars.iter().enumerate() {
        match position {
            Position::Flat => {
                // A sell without a position is dropped; an entry consumes
                // the whole bar, so a same-bar raw sell is dropped too.
                if raw_buy[i] {
                    buy[i] = true;
                    position = Position::Long {
                        entry_price: bar.close,
                        extreme: bar.close,
                    };
                }
            }
            Position::Long {
                entry_price,
                extreme,
            } => {
                let extreme = extreme.max(bar.close);
                position = Position::Long {
                    entry_price,
                    extreme,
                };

                if raw_sell[i] || overlay_exit(bar.close, entry_price, extreme, overlays) {
                    sell[i] = true;
                    position = Position::Flat;
                }
            }
        }
    }

    ResolvedSignals { buy, sell }
}

/// Stop-loss is checked before take-profit, so a bar qualifying for both
/// resolves as a stop.
fn overlay_exit(close: f64, entry_price: f64, extreme: f64, overlays: &Overlays) -> bool {
    if let Some(stop) = overlays.stop_loss {
        let anchor = match stop.mode {
            StopMode::Normal => entry_price,
            StopMode::Trailing => extreme,
        };
        let trigger = anchor * (1.0 - stop.percent / 100.0);
        if close <= trigger {
            return true;
        }
    }

    if let Some(take) = overlays.take_profit {
        let target = entry_price * (1.0 + take.percent / 100.0);
        if close >= target {
            return true;
        }
    }

    false
}
