// src/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One OHLC observation for a fixed time interval.
/// Bar series are ordered oldest to newest before any indicator math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "WAIT")]
    Wait,
}

impl Action {
    /// Stable enumeration order used for preference-table tie-breaks.
    pub const ALL: [Action; 3] = [Action::Buy, Action::Sell, Action::Wait];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Wait => "WAIT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeResult {
    #[serde(rename = "WIN")]
    Win,
    #[serde(rename = "LOSS")]
    Loss,
}

impl fmt::Display for TradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TradeResult::Win => "WIN",
            TradeResult::Loss => "LOSS",
        })
    }
}

/// Final product of one evaluation cycle for one pair. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSignal {
    pub pair: String,
    pub action: Action,
    pub confidence: u32,
    pub state: String,
    pub reasons: Vec<String>,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
    /// Advisory (min, max) holding time in minutes. Not enforced by a timer.
    pub hold_window: (u32, u32),
}

impl TradeSignal {
    /// Terminal degraded branch: no usable market data for this pair.
    pub fn no_data(pair: &str, reason: String) -> Self {
        Self {
            pair: pair.to_string(),
            action: Action::Wait,
            confidence: 0,
            state: "NO_DATA".to_string(),
            reasons: vec![reason],
            take_profit: None,
            stop_loss: None,
            hold_window: (0, 0),
        }
    }
}

/// A tracked open position awaiting settlement on a later cycle.
/// `entry_close` is the close observed when the signal was issued; realized
/// profit is measured from it, not from a fill price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTrade {
    pub action: Action,
    pub state: String,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub entry_close: f64,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityEntry {
    pub time: DateTime<Utc>,
    pub result: TradeResult,
    pub profit: f64,
    pub balance: f64,
}

/// Running paper-equity ledger. History is append-only; balance is the
/// running sum over recorded profits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equity {
    pub balance: f64,
    pub history: Vec<EquityEntry>,
}

impl Default for Equity {
    fn default() -> Self {
        Self {
            balance: 1000.0,
            history: Vec::new(),
        }
    }
}

impl Equity {
    /// Applies a settled outcome and returns the new balance.
    pub fn record(&mut self, result: TradeResult, profit: f64, time: DateTime<Utc>) -> f64 {
        self.balance += profit;
        self.history.push(EquityEntry {
            time,
            result,
            profit,
            balance: self.balance,
        });
        self.balance
    }
}
