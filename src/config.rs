// src/config.rs

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// One evaluation pass over the pair list, then exit (cron / CI use).
    Once,
    /// Loop with an inter-cycle sleep until Ctrl+C.
    Daemon,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Preference-table lookup gated by confidence.
    Preference,
    /// Demand/supply-zone bias overrides the table when present.
    ZoneBias,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    #[serde(default = "default_ema_fast_span")]
    pub ema_fast_span: usize,
    #[serde(default = "default_ema_slow_span")]
    pub ema_slow_span: usize,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,
    #[serde(default = "default_range_period")]
    pub range_period: usize,
    /// Relative distance to a range extreme that counts as "at the zone".
    #[serde(default = "default_range_proximity_pct")]
    pub range_proximity_pct: f64,
    /// Evaluations over fewer bars than this short-circuit to NO_DATA.
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,
    /// Initial minimum-confidence gate; the live value adapts between runs.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: u32,
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: u32,
    #[serde(default = "default_confidence_ceiling")]
    pub confidence_ceiling: u32,
    #[serde(default = "default_exploration_rate")]
    pub exploration_rate: f64,
    #[serde(default = "default_policy")]
    pub policy: PolicyMode,
    #[serde(default = "default_tp_atr_multiple")]
    pub tp_atr_multiple: f64,
    #[serde(default = "default_sl_atr_multiple")]
    pub sl_atr_multiple: f64,
    #[serde(default = "default_hold_min_minutes")]
    pub hold_min_minutes: u32,
    #[serde(default = "default_hold_max_minutes")]
    pub hold_max_minutes: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketConfig {
    pub api_key: String,
    #[serde(default = "default_market_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "snake_case", tag = "backend")]
pub enum StorageConfig {
    File {
        #[serde(default = "default_state_path")]
        path: String,
    },
    Paste {
        endpoint: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub pairs: Vec<String>,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    #[serde(default = "default_bar_count")]
    pub bar_count: usize,
    /// When set, a cycle only runs within this many minutes of an
    /// interval mark (guards against late scheduler triggers).
    #[serde(default)]
    pub boundary_tolerance_minutes: Option<u32>,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_run_mode")]
    pub run_mode: RunMode,
    #[serde(default = "default_cycle_secs")]
    pub cycle_secs: u64,
    #[serde(default)]
    pub debug: bool,
    /// Fixed seed for reproducible jitter/exploration; entropy when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
    pub market: MarketConfig,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("Settings").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("pairs"),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pairs.is_empty() {
            return Err(ConfigError::Message(
                "at least one pair must be configured".to_string(),
            ));
        }
        if self.market.api_key.is_empty() {
            return Err(ConfigError::Message(
                "market.api_key must not be empty".to_string(),
            ));
        }
        if self.strategy.confidence_floor > self.strategy.confidence_ceiling {
            return Err(ConfigError::Message(
                "strategy.confidence_floor must not exceed confidence_ceiling".to_string(),
            ));
        }
        if self.strategy.hold_min_minutes > self.strategy.hold_max_minutes {
            return Err(ConfigError::Message(
                "strategy.hold_min_minutes must not exceed hold_max_minutes".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            ema_fast_span: default_ema_fast_span(),
            ema_slow_span: default_ema_slow_span(),
            rsi_period: default_rsi_period(),
            atr_period: default_atr_period(),
            range_period: default_range_period(),
            range_proximity_pct: default_range_proximity_pct(),
            min_bars: default_min_bars(),
            min_confidence: default_min_confidence(),
            confidence_floor: default_confidence_floor(),
            confidence_ceiling: default_confidence_ceiling(),
            exploration_rate: default_exploration_rate(),
            policy: default_policy(),
            tp_atr_multiple: default_tp_atr_multiple(),
            sl_atr_multiple: default_sl_atr_multiple(),
            hold_min_minutes: default_hold_min_minutes(),
            hold_max_minutes: default_hold_max_minutes(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File {
            path: default_state_path(),
        }
    }
}

fn default_ema_fast_span() -> usize {
    20
}
fn default_ema_slow_span() -> usize {
    50
}
fn default_rsi_period() -> usize {
    14
}
fn default_atr_period() -> usize {
    14
}
fn default_range_period() -> usize {
    20
}
fn default_range_proximity_pct() -> f64 {
    0.002
}
fn default_min_bars() -> usize {
    60
}
fn default_min_confidence() -> u32 {
    70
}
fn default_confidence_floor() -> u32 {
    60
}
fn default_confidence_ceiling() -> u32 {
    85
}
fn default_exploration_rate() -> f64 {
    0.05
}
fn default_policy() -> PolicyMode {
    PolicyMode::Preference
}
fn default_tp_atr_multiple() -> f64 {
    1.5
}
fn default_sl_atr_multiple() -> f64 {
    1.0
}
fn default_hold_min_minutes() -> u32 {
    30
}
fn default_hold_max_minutes() -> u32 {
    120
}
fn default_market_base_url() -> String {
    "https://api.twelvedata.com".to_string()
}
fn default_state_path() -> String {
    "bot_state.json".to_string()
}
fn default_interval_minutes() -> u32 {
    30
}
fn default_bar_count() -> usize {
    120
}
fn default_http_timeout_secs() -> u64 {
    10
}
fn default_run_mode() -> RunMode {
    RunMode::Once
}
fn default_cycle_secs() -> u64 {
    1800
}
