// =============================================================================
// Aurora Signals — Poller Entry Point
// =============================================================================
//
// Refreshes candles from the JSON feed every `refresh_interval_secs` and
// evaluates every symbol every `poll_interval_secs`, logging each signal.
// Stops on Ctrl-C.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use aurora_signals::feed::{JsonFileFeed, TracingSink};
use aurora_signals::market_data::CandleBuffer;
use aurora_signals::runtime_config::RuntimeConfig;
use aurora_signals::strategy::StrategyEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Aurora Signals starting up");

    let config_path =
        std::env::var("AURORA_CONFIG").unwrap_or_else(|_| "runtime_config.json".into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Override symbols / candle file from env if available.
    if let Ok(syms) = std::env::var("AURORA_SYMBOLS") {
        let syms: Vec<String> = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !syms.is_empty() {
            config.symbols = syms;
        }
    }
    if let Ok(path) = std::env::var("AURORA_CANDLES_FILE") {
        config.candles_file = path;
    }
    config.validate()?;

    info!(
        symbols = ?config.symbols,
        candles_file = %config.candles_file,
        poll_secs = config.poll_interval_secs,
        refresh_secs = config.refresh_interval_secs,
        bot_active = config.bot_active,
        "Configured signal poller"
    );

    // ── 2. Wire collaborators ────────────────────────────────────────────
    let buffer = Arc::new(CandleBuffer::new(config.history_len));
    let feed = Arc::new(JsonFileFeed::new(&config.candles_file));
    info!(path = %feed.path().display(), "Using JSON candle feed");

    let refresh_every = Duration::from_secs(config.refresh_interval_secs);
    let poll_every = Duration::from_secs(config.poll_interval_secs);
    let engine = Arc::new(StrategyEngine::new(
        config,
        buffer,
        feed,
        Arc::new(TracingSink),
    ));

    let initial_engine = engine.clone();
    let initial = tokio::task::spawn_blocking(move || initial_engine.refresh()).await?;
    info!(candles = initial, "Initial candle history loaded");

    // ── 3. Candle refresh loop ───────────────────────────────────────────
    let refresh_engine = engine.clone();
    let refresh_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_every);
        loop {
            interval.tick().await;
            let engine = refresh_engine.clone();
            match tokio::task::spawn_blocking(move || engine.refresh()).await {
                Ok(0) => {}
                Ok(appended) => info!(appended, "New candles merged"),
                Err(e) => warn!(error = %e, "candle refresh task failed"),
            }
        }
    });

    // ── 4. Signal evaluation loop ────────────────────────────────────────
    let eval_engine = engine.clone();
    let eval_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_every);
        loop {
            interval.tick().await;
            let records = eval_engine.run_cycle();
            info!(evaluated = records.len(), "Signal cycle complete");
        }
    });

    // ── 5. Shutdown ──────────────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    refresh_task.abort();
    eval_task.abort();

    Ok(())
}
