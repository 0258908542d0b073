//! Action selection: preference lookup, exploration noise, confidence gate,
//! and the ATR-multiple target/stop levels.

use crate::analysis::confidence::Assessment;
use crate::config::{PolicyMode, StrategyConfig};
use crate::policy::memory::SignalMemory;
use crate::types::Action;
use rand::Rng;

/// Picks the action for one evaluation.
///
/// 1. Preference-table argmax for the state (seeding it when unseen).
/// 2. With probability `exploration_rate`, a uniform random override.
/// 3. The confidence gate forces WAIT below the adaptive threshold.
///
/// In zone-bias mode a present bias replaces the gate: above the threshold
/// the bias is followed outright, below it a coin flip decides between the
/// bias and WAIT.
pub fn select_action(
    state_key: &str,
    assessment: &Assessment,
    memory: &mut SignalMemory,
    min_confidence: u32,
    cfg: &StrategyConfig,
    rng: &mut impl Rng,
) -> Action {
    let mut action = memory.scores(state_key).best();

    if rng.gen::<f64>() < cfg.exploration_rate {
        action = Action::ALL[rng.gen_range(0..Action::ALL.len())];
    }

    match cfg.policy {
        PolicyMode::Preference => {
            if assessment.score < min_confidence {
                action = Action::Wait;
            }
        }
        PolicyMode::ZoneBias => match assessment.bias {
            Some(bias) if assessment.score >= min_confidence => action = bias,
            Some(bias) => {
                action = if rng.gen_bool(0.5) { bias } else { Action::Wait };
            }
            None => {
                if assessment.score < min_confidence {
                    action = Action::Wait;
                }
            }
        },
    }

    action
}

/// Take-profit / stop-loss for a non-WAIT action: TP at `tp_atr_multiple`
/// ATRs in the signal's direction, SL at `sl_atr_multiple` ATRs against it.
pub fn price_targets(
    action: Action,
    close: f64,
    atr: f64,
    cfg: &StrategyConfig,
) -> (Option<f64>, Option<f64>) {
    match action {
        Action::Buy => (
            Some(close + cfg.tp_atr_multiple * atr),
            Some(close - cfg.sl_atr_multiple * atr),
        ),
        Action::Sell => (
            Some(close - cfg.tp_atr_multiple * atr),
            Some(close + cfg.sl_atr_multiple * atr),
        ),
        Action::Wait => (None, None),
    }
}
