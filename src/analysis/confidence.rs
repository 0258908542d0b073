//! Rule-based confidence scoring. Evidence stacks; there is no upper clamp.
//!
//! The jitter term is intentional noise from the caller-supplied RNG, so a
//! seeded generator makes the whole assessment reproducible.

use crate::analysis::indicators::{IndicatorSnapshot, RangeExtremes};
use crate::analysis::state::{MarketState, RsiZone, Trend};
use crate::config::StrategyConfig;
use crate::types::Action;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub score: u32,
    pub reasons: Vec<String>,
    /// Directional hint from the demand/supply-zone proximity rule.
    pub bias: Option<Action>,
}

pub fn assess(
    snapshot: &IndicatorSnapshot,
    state: &MarketState,
    range: Option<RangeExtremes>,
    cfg: &StrategyConfig,
    rng: &mut impl Rng,
) -> Assessment {
    let mut score: u32 = 0;
    let mut reasons = Vec::new();
    let mut bias = None;

    score += 40;
    reasons.push("EMA trend confirmed".to_string());

    match (state.zone, state.trend) {
        (RsiZone::Normal, _) => {
            score += 30;
            reasons.push("RSI normal zone".to_string());
        }
        (RsiZone::Oversold, Trend::Up) => {
            score += 20;
            reasons.push("RSI oversold in uptrend".to_string());
        }
        (RsiZone::Overbought, Trend::Down) => {
            score += 20;
            reasons.push("RSI overbought in downtrend".to_string());
        }
        _ => {}
    }

    if let Some(range) = range {
        if snapshot.close <= range.low * (1.0 + cfg.range_proximity_pct) {
            score += 15;
            bias = Some(Action::Buy);
            reasons.push("price at demand zone (recent low)".to_string());
        } else if snapshot.close >= range.high * (1.0 - cfg.range_proximity_pct) {
            score += 15;
            bias = Some(Action::Sell);
            reasons.push("price at supply zone (recent high)".to_string());
        }
    }

    score += rng.gen_range(0..=5);

    Assessment {
        score,
        reasons,
        bias,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snap(close: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            ema_fast: 1.01,
            ema_slow: 1.0,
            rsi: 50.0,
            atr: 0.001,
            close,
        }
    }

    fn state(trend: Trend, zone: RsiZone) -> MarketState {
        MarketState { trend, zone }
    }

    #[test]
    fn base_evidence_is_unconditional() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = assess(
            &snap(1.0),
            &state(Trend::Down, RsiZone::Overbought),
            None,
            &StrategyConfig::default(),
            &mut rng,
        );
        assert_eq!(a.reasons[0], "EMA trend confirmed");
        // 40 base + 20 aligned reversal + jitter
        assert!((60..=65).contains(&a.score), "score {}", a.score);
    }

    #[test]
    fn normal_zone_scores_within_jitter_band() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = assess(
            &snap(1.0),
            &state(Trend::Up, RsiZone::Normal),
            None,
            &StrategyConfig::default(),
            &mut rng,
        );
        assert!((70..=75).contains(&a.score), "score {}", a.score);
        assert!(a.reasons.contains(&"RSI normal zone".to_string()));
        assert_eq!(a.bias, None);
    }

    #[test]
    fn misaligned_reversal_zone_gets_no_bonus() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = assess(
            &snap(1.0),
            &state(Trend::Up, RsiZone::Overbought),
            None,
            &StrategyConfig::default(),
            &mut rng,
        );
        assert!((40..=45).contains(&a.score), "score {}", a.score);
    }

    #[test]
    fn demand_zone_adds_bonus_and_buy_bias() {
        let mut rng = StdRng::seed_from_u64(1);
        let range = RangeExtremes {
            low: 1.0,
            high: 1.05,
        };
        let a = assess(
            &snap(1.001), // within 0.2% of the low
            &state(Trend::Up, RsiZone::Normal),
            Some(range),
            &StrategyConfig::default(),
            &mut rng,
        );
        assert!((85..=90).contains(&a.score), "score {}", a.score);
        assert_eq!(a.bias, Some(Action::Buy));
    }

    #[test]
    fn supply_zone_biases_sell() {
        let mut rng = StdRng::seed_from_u64(1);
        let range = RangeExtremes {
            low: 1.0,
            high: 1.05,
        };
        let a = assess(
            &snap(1.0495),
            &state(Trend::Up, RsiZone::Normal),
            Some(range),
            &StrategyConfig::default(),
            &mut rng,
        );
        assert_eq!(a.bias, Some(Action::Sell));
    }

    #[test]
    fn fixed_seed_reproduces_the_assessment() {
        let cfg = StrategyConfig::default();
        let s = snap(1.0);
        let st = state(Trend::Up, RsiZone::Normal);

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = assess(&s, &st, None, &cfg, &mut rng_a);
        let b = assess(&s, &st, None, &cfg, &mut rng_b);
        assert_eq!(a, b);
    }
}
