//! Indicator engine: trend averages, momentum oscillator, volatility.
//!
//! ewm_mean: adjusted exponentially weighted mean,
//!   y[t] = sum((1-a)^i * x[t-i]) / sum((1-a)^i), a = 2/(span+1).
//! rsi: per-bar deltas split into gain/loss, simple moving average of each
//!   over `period`, oscillator = 100 - 100/(1 + avg_gain/avg_loss).
//!   avg_loss == 0 clamps the oscillator to 100.
//! atr: true range max(high-low, |high-prev_close|, |low-prev_close|),
//!   simple moving average over `period`.
//!
//! All pure functions of the input series; warm-up prefixes are NaN. Only
//! the latest values feed the rest of the pipeline (see `snapshot`).

use crate::config::StrategyConfig;
use crate::types::Bar;

/// Latest indicator values for one bar series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub atr: f64,
    pub close: f64,
}

/// Min low / max high over the most recent range window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeExtremes {
    pub low: f64,
    pub high: f64,
}

/// Adjusted exponentially weighted mean with the given span.
/// Weights decay geometrically with recency; defined from the first value.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &x) in values.iter().enumerate() {
        num = x + decay * num;
        den = 1.0 + decay * den;
        result[i] = num / den;
    }
    result
}

/// RSI-style oscillator over close prices. NaN until `period` deltas exist.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    for i in period..n {
        let window = i + 1 - period..=i;
        let avg_gain: f64 = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss: f64 = losses[window].iter().sum::<f64>() / period as f64;

        result[i] = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
    }
    result
}

/// True range series. The first bar has no previous close, so it stays NaN.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

/// ATR-style volatility: simple moving average of true range.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    let tr = true_range(bars);
    let n = tr.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    for i in period..n {
        result[i] = tr[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
    }
    result
}

/// Extremes of the last `period` bars, for the demand/supply-zone check.
pub fn recent_range(bars: &[Bar], period: usize) -> Option<RangeExtremes> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let window = &bars[bars.len() - period..];
    let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let high = window
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    Some(RangeExtremes { low, high })
}

/// Latest values of all indicators plus the last close. `None` when the
/// series is too short to produce finite values everywhere.
pub fn snapshot(bars: &[Bar], cfg: &StrategyConfig) -> Option<IndicatorSnapshot> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let ema_fast = *ewm_mean(&closes, cfg.ema_fast_span).last()?;
    let ema_slow = *ewm_mean(&closes, cfg.ema_slow_span).last()?;
    let rsi_latest = *rsi(&closes, cfg.rsi_period).last()?;
    let atr_latest = *atr(bars, cfg.atr_period).last()?;
    let close = *closes.last()?;

    let snap = IndicatorSnapshot {
        ema_fast,
        ema_slow,
        rsi: rsi_latest,
        atr: atr_latest,
        close,
    };
    let values = [ema_fast, ema_slow, rsi_latest, atr_latest, close];
    if values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(snap)
}
