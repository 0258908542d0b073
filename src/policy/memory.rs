//! Learned per-state action preferences and the adaptive confidence gate.

use crate::types::{Action, TradeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Preference counters for one market state. Unseen states start at 1 per
/// action so an untouched entry is a genuine three-way tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionScores {
    #[serde(rename = "BUY")]
    pub buy: i64,
    #[serde(rename = "SELL")]
    pub sell: i64,
    #[serde(rename = "WAIT")]
    pub wait: i64,
}

impl ActionScores {
    pub fn seeded() -> Self {
        Self {
            buy: 1,
            sell: 1,
            wait: 1,
        }
    }

    pub fn get(&self, action: Action) -> i64 {
        match action {
            Action::Buy => self.buy,
            Action::Sell => self.sell,
            Action::Wait => self.wait,
        }
    }

    fn get_mut(&mut self, action: Action) -> &mut i64 {
        match action {
            Action::Buy => &mut self.buy,
            Action::Sell => &mut self.sell,
            Action::Wait => &mut self.wait,
        }
    }

    /// Argmax over the fixed enumeration order [BUY, SELL, WAIT].
    /// Strict `>` keeps the earliest action on ties.
    pub fn best(&self) -> Action {
        let mut best = Action::Buy;
        for action in [Action::Sell, Action::Wait] {
            if self.get(action) > self.get(best) {
                best = action;
            }
        }
        best
    }
}

/// State -> action preference table. Read by the selector, written only by
/// the outcome evaluator; persisted between runs as part of the state
/// document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalMemory(BTreeMap<String, ActionScores>);

impl SignalMemory {
    /// Scores for `state`, seeding an unseen state on first lookup.
    pub fn scores(&mut self, state: &str) -> ActionScores {
        *self
            .0
            .entry(state.to_string())
            .or_insert_with(ActionScores::seeded)
    }

    pub fn get(&self, state: &str) -> Option<&ActionScores> {
        self.0.get(state)
    }

    /// Nudges the counter for the action taken in `state`. Loss counters
    /// may go negative.
    pub fn reinforce(&mut self, state: &str, action: Action, result: TradeResult) {
        let scores = self
            .0
            .entry(state.to_string())
            .or_insert_with(ActionScores::seeded);
        let slot = scores.get_mut(action);
        match result {
            TradeResult::Win => *slot += 1,
            TradeResult::Loss => *slot -= 1,
        }
    }
}

/// WIN relaxes the gate by 1, never below `floor`.
pub fn lower_threshold(value: u32, floor: u32) -> u32 {
    value.saturating_sub(1).max(floor)
}

/// LOSS tightens the gate by 2, never above `ceiling`.
pub fn raise_threshold(value: u32, ceiling: u32) -> u32 {
    (value + 2).min(ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_state_is_seeded_once() {
        let mut memory = SignalMemory::default();
        assert_eq!(memory.scores("UP_NORMAL"), ActionScores::seeded());

        memory.reinforce("UP_NORMAL", Action::Buy, TradeResult::Win);
        // Second lookup must not reset the entry.
        assert_eq!(memory.scores("UP_NORMAL").buy, 2);
    }

    #[test]
    fn loss_counters_may_go_negative() {
        let mut memory = SignalMemory::default();
        for _ in 0..3 {
            memory.reinforce("DOWN_OVERSOLD", Action::Sell, TradeResult::Loss);
        }
        assert_eq!(memory.get("DOWN_OVERSOLD").unwrap().sell, -2);
    }

    #[test]
    fn best_prefers_strict_maximum() {
        let mut memory = SignalMemory::default();
        memory.reinforce("UP_NORMAL", Action::Sell, TradeResult::Win);
        assert_eq!(memory.scores("UP_NORMAL").best(), Action::Sell);
    }

    #[test]
    fn best_tie_breaks_in_enumeration_order() {
        assert_eq!(ActionScores::seeded().best(), Action::Buy);

        let scores = ActionScores {
            buy: 2,
            sell: 5,
            wait: 5,
        };
        assert_eq!(scores.best(), Action::Sell);
    }

    #[test]
    fn threshold_never_drops_below_floor() {
        let mut value = 70;
        for _ in 0..50 {
            value = lower_threshold(value, 60);
        }
        assert_eq!(value, 60);
    }

    #[test]
    fn threshold_never_exceeds_ceiling() {
        let mut value = 70;
        for _ in 0..50 {
            value = raise_threshold(value, 85);
        }
        assert_eq!(value, 85);
    }
}
