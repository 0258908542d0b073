// src/main.rs
use anyhow::Context;
use dotenvy::dotenv;
use fx_sniper::config::{AppConfig, RunMode, StorageConfig};
use fx_sniper::connectors::telegram::{LogNotifier, TelegramNotifier};
use fx_sniper::connectors::traits::Notifier;
use fx_sniper::connectors::twelvedata::TwelveDataClient;
use fx_sniper::core::engine::SignalEngine;
use fx_sniper::storage::file::FileStore;
use fx_sniper::storage::paste::PasteStore;
use fx_sniper::storage::StateStore;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Missing or inconsistent configuration is fatal: no partial runs.
    let config = AppConfig::new().context("configuration error")?;

    tracing_subscriber::fmt()
        .with_max_level(if config.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    println!("========================================");
    println!("        FX SNIPER BOT - v0.1.1");
    println!("========================================");
    println!("Pairs:  {}", config.pairs.join(", "));
    println!("TF:     M{}", config.interval_minutes);
    println!(
        "Mode:   {}",
        match config.run_mode {
            RunMode::Once => "single pass",
            RunMode::Daemon => "daemon loop",
        }
    );
    println!("========================================");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let market = Box::new(TwelveDataClient::new(
        http.clone(),
        config.market.api_key.clone(),
        config.market.base_url.clone(),
    ));

    let notifier: Box<dyn Notifier> = match &config.telegram {
        Some(tg) => Box::new(TelegramNotifier::new(
            http.clone(),
            tg.bot_token.clone(),
            tg.chat_id.clone(),
        )),
        None => {
            info!("No Telegram credentials configured. Signals go to the log only.");
            Box::new(LogNotifier)
        }
    };

    let store: Box<dyn StateStore> = match &config.storage {
        StorageConfig::File { path } => Box::new(FileStore::new(path)),
        StorageConfig::Paste { endpoint, api_key } => Box::new(PasteStore::new(
            http.clone(),
            endpoint.clone(),
            api_key.clone(),
        )),
    };

    let mut engine = SignalEngine::new(config, market, notifier, store);
    engine.run().await
}
