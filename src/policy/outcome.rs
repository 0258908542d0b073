//! Settlement of a tracked position against a fresh price observation.

use crate::types::{Action, PendingTrade, TradeResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeOutcome {
    pub result: TradeResult,
    pub profit: f64,
}

/// WIN when the price has moved through the take-profit in the favorable
/// direction, LOSS when through the stop. `None` while neither level has
/// been crossed (the position stays open) and for WAIT entries.
///
/// Profit is the trigger level minus the close observed at signal time,
/// signed by direction.
pub fn settle(pending: &PendingTrade, price: f64) -> Option<TradeOutcome> {
    match pending.action {
        Action::Wait => None,
        Action::Buy => {
            if price >= pending.take_profit {
                Some(TradeOutcome {
                    result: TradeResult::Win,
                    profit: pending.take_profit - pending.entry_close,
                })
            } else if price <= pending.stop_loss {
                Some(TradeOutcome {
                    result: TradeResult::Loss,
                    profit: pending.stop_loss - pending.entry_close,
                })
            } else {
                None
            }
        }
        Action::Sell => {
            if price <= pending.take_profit {
                Some(TradeOutcome {
                    result: TradeResult::Win,
                    profit: pending.entry_close - pending.take_profit,
                })
            } else if price >= pending.stop_loss {
                Some(TradeOutcome {
                    result: TradeResult::Loss,
                    profit: pending.entry_close - pending.stop_loss,
                })
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const TOLERANCE: f64 = 1e-9;

    fn pending(action: Action, tp: f64, sl: f64, entry_close: f64) -> PendingTrade {
        PendingTrade {
            action,
            state: "UP_NORMAL".to_string(),
            take_profit: tp,
            stop_loss: sl,
            entry_close,
            issued_at: Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn buy_win_profit_is_tp_minus_entry_close() {
        let trade = pending(Action::Buy, 1.1050, 1.1000, 1.1020);
        let outcome = settle(&trade, 1.1051).unwrap();
        assert_eq!(outcome.result, TradeResult::Win);
        assert!((outcome.profit - 0.0030).abs() < TOLERANCE);
    }

    #[test]
    fn buy_loss_profit_is_sl_minus_entry_close() {
        let trade = pending(Action::Buy, 1.1050, 1.1000, 1.1020);
        let outcome = settle(&trade, 1.0999).unwrap();
        assert_eq!(outcome.result, TradeResult::Loss);
        assert!((outcome.profit + 0.0021).abs() < TOLERANCE);
    }

    #[test]
    fn buy_between_levels_stays_open() {
        let trade = pending(Action::Buy, 1.1050, 1.1000, 1.1020);
        assert_eq!(settle(&trade, 1.1025), None);
    }

    #[test]
    fn sell_is_mirrored() {
        let trade = pending(Action::Sell, 1.0990, 1.1040, 1.1020);

        let win = settle(&trade, 1.0989).unwrap();
        assert_eq!(win.result, TradeResult::Win);
        assert!((win.profit - 0.0030).abs() < TOLERANCE);

        let loss = settle(&trade, 1.1041).unwrap();
        assert_eq!(loss.result, TradeResult::Loss);
        assert!((loss.profit + 0.0020).abs() < TOLERANCE);
    }

    #[test]
    fn exact_level_touch_settles() {
        let trade = pending(Action::Buy, 1.1050, 1.1000, 1.1020);
        assert_eq!(settle(&trade, 1.1050).unwrap().result, TradeResult::Win);
        assert_eq!(settle(&trade, 1.1000).unwrap().result, TradeResult::Loss);
    }

    #[test]
    fn wait_entry_never_settles() {
        let trade = pending(Action::Wait, 1.1050, 1.1000, 1.1020);
        assert_eq!(settle(&trade, 2.0), None);
    }
}
