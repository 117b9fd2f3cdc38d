// =============================================================================
// Runtime Configuration — poller settings and signal parameters, atomic save
// =============================================================================
//
// Everything the poller needs lives here and is passed explicitly into the
// engine; nothing is read from ambient state.
//
// Saves go through a sibling tmp file and a rename.  Every field has a serde
// default, so a partial file loads.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::signals::SignalConfig;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_symbols() -> Vec<String> {
    vec![
        "BTC/INR".to_string(),
        "ETH/INR".to_string(),
        "BNB/INR".to_string(),
        "TCS.NSE".to_string(),
        "RELIANCE.NSE".to_string(),
        "USD/INR".to_string(),
    ]
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_refresh_interval_secs() -> u64 {
    2
}

fn default_history_len() -> usize {
    100
}

fn default_alert_confidence() -> f64 {
    0.7
}

fn default_candles_file() -> String {
    "candles.json".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Poller settings plus the signal configuration handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Symbols the poller evaluates.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// When false the poller keeps refreshing candles but emits no signals.
    #[serde(default = "default_true")]
    pub bot_active: bool,

    /// Seconds between signal evaluations.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Seconds between candle refreshes from the feed.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Candles retained per symbol.
    #[serde(default = "default_history_len")]
    pub history_len: usize,

    /// Signals strictly above this confidence raise an alert.
    #[serde(default = "default_alert_confidence")]
    pub alert_confidence: f64,

    /// JSON candle file read by the default feed.
    #[serde(default = "default_candles_file")]
    pub candles_file: String,

    /// Indicator periods and decision thresholds.
    #[serde(default)]
    pub signal: SignalConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            bot_active: true,
            poll_interval_secs: default_poll_interval_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            history_len: default_history_len(),
            alert_confidence: default_alert_confidence(),
            candles_file: default_candles_file(),
            signal: SignalConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Read and validate a JSON config.  A missing or malformed file is an
    /// error; `main` falls back to defaults on it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path)
            .with_context(|| format!("cannot open config {}", path.display()))?;
        let config: Self = serde_json::from_slice(&raw)
            .with_context(|| format!("malformed config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("rejected config {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = config.symbols.len(),
            bot_active = config.bot_active,
            alert_confidence = config.alert_confidence,
            "config loaded"
        );
        Ok(config)
    }

    /// Write the config next to `path` as `<name>.json.tmp`, then rename it
    /// over `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let staging = path.with_extension("json.tmp");

        let body = serde_json::to_vec_pretty(self).context("cannot encode config")?;
        std::fs::write(&staging, body)
            .with_context(|| format!("cannot write {}", staging.display()))?;
        std::fs::rename(&staging, path)
            .with_context(|| format!("cannot move {} into place", staging.display()))?;

        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Reject settings the poller or the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 || self.refresh_interval_secs == 0 {
            bail!("poll and refresh intervals must be at least one second");
        }
        if self.history_len == 0 {
            bail!("history_len must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.alert_confidence) {
            bail!("alert_confidence must be within [0, 1], got {}", self.alert_confidence);
        }

        let p = &self.signal.params;
        let periods = [
            ("rsi_period", p.rsi_period),
            ("macd_fast", p.macd_fast),
            ("macd_slow", p.macd_slow),
            ("macd_signal", p.macd_signal),
            ("bb_period", p.bb_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, v)| *v == 0) {
            bail!("{name} must be at least 1");
        }
        if !p.bb_std_dev.is_finite() || p.bb_std_dev < 0.0 {
            bail!("bb_std_dev must be finite and non-negative, got {}", p.bb_std_dev);
        }

        self.signal.rules.validate()?;
        Ok(())
    }
}
