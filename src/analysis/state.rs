//! Discrete market-state classification: `{TREND}_{ZONE}`.

use crate::analysis::indicators::IndicatorSnapshot;
use std::fmt;

pub const OVERSOLD_CUTOFF: f64 = 35.0;
pub const OVERBOUGHT_CUTOFF: f64 = 65.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "UP",
            Trend::Down => "DOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Oversold,
    Normal,
    Overbought,
}

impl RsiZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsiZone::Oversold => "OVERSOLD",
            RsiZone::Normal => "NORMAL",
            RsiZone::Overbought => "OVERBOUGHT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketState {
    pub trend: Trend,
    pub zone: RsiZone,
}

impl MarketState {
    /// Preference-table key, e.g. "UP_NORMAL".
    pub fn key(&self) -> String {
        format!("{}_{}", self.trend.as_str(), self.zone.as_str())
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.trend.as_str(), self.zone.as_str())
    }
}

/// Trend is UP only on a strict fast-over-slow cross; equality counts as
/// DOWN. Zone cutoffs are open intervals: exactly 35 or 65 is NORMAL.
pub fn classify(snapshot: &IndicatorSnapshot) -> MarketState {
    let trend = if snapshot.ema_fast > snapshot.ema_slow {
        Trend::Up
    } else {
        Trend::Down
    };

    let zone = if snapshot.rsi < OVERSOLD_CUTOFF {
        RsiZone::Oversold
    } else if snapshot.rsi > OVERBOUGHT_CUTOFF {
        RsiZone::Overbought
    } else {
        RsiZone::Normal
    };

    MarketState { trend, zone }
}
