// =============================================================================
// Collaborator seams — where candles come from and where signals go
// =============================================================================
//
// The engine neither fetches nor stores anything.  The poller talks to a
// `CandleFeed` for history and to a `SignalSink` for every evaluated signal;
// both are traits so a live exchange client or a database writer can slot in
// without touching the engine.
// =============================================================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::signals::SignalRecord;
use crate::types::{Candle, SignalKind};

/// Source of chronologically ordered candles.
pub trait CandleFeed: Send + Sync {
    /// Latest known candles for `symbol`, oldest first.
    fn fetch(&self, symbol: &str) -> Result<Vec<Candle>>;

    /// One refresh worth of candles, a result per requested symbol.
    ///
    /// Feeds that can serve every symbol from a single read should override
    /// this; the default fetches symbol by symbol.
    fn fetch_many(&self, symbols: &[String]) -> Vec<(String, Result<Vec<Candle>>)> {
        symbols
            .iter()
            .map(|symbol| (symbol.clone(), self.fetch(symbol)))
            .collect()
    }
}

/// Destination for evaluated signals (display, persistence, alerts).
pub trait SignalSink: Send + Sync {
    fn publish(&self, record: &SignalRecord) -> Result<()>;
}

// ---------------------------------------------------------------------------
// JsonFileFeed
// ---------------------------------------------------------------------------

/// Reads candles from a JSON file shaped as `{ "<symbol>": [candle, ...] }`.
///
/// The file is re-read on every refresh, once for all symbols, so an external
/// writer can append bars while the poller runs.
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, Vec<Candle>>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read candles from {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse candles from {}", self.path.display()))
    }

    fn take(&self, all: &mut HashMap<String, Vec<Candle>>, symbol: &str) -> Vec<Candle> {
        all.remove(symbol).unwrap_or_else(|| {
            warn!(symbol = %symbol, path = %self.path.display(), "symbol not in candle file");
            Vec::new()
        })
    }
}

impl CandleFeed for JsonFileFeed {
    fn fetch(&self, symbol: &str) -> Result<Vec<Candle>> {
        let mut all = self.load()?;
        Ok(self.take(&mut all, symbol))
    }

    fn fetch_many(&self, symbols: &[String]) -> Vec<(String, Result<Vec<Candle>>)> {
        match self.load() {
            Ok(mut all) => symbols
                .iter()
                .map(|symbol| (symbol.clone(), Ok(self.take(&mut all, symbol))))
                .collect(),
            Err(e) => {
                let reason = format!("{e:#}");
                symbols
                    .iter()
                    .map(|symbol| (symbol.clone(), Err(anyhow::anyhow!("{reason}"))))
                    .collect()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Logs every record through `tracing`; directional signals at INFO, holds
/// at DEBUG.
#[derive(Debug, Default)]
pub struct TracingSink;

impl SignalSink for TracingSink {
    fn publish(&self, record: &SignalRecord) -> Result<()> {
        if record.signal_type == SignalKind::Hold {
            tracing::debug!(
                id = %record.id,
                symbol = %record.symbol,
                price = record.price,
                "hold"
            );
        } else {
            info!(
                id = %record.id,
                symbol = %record.symbol,
                signal = %record.signal_type,
                confidence = record.confidence,
                price = record.price,
                rsi = ?record.rsi,
                macd = ?record.macd,
                signal_line = ?record.signal_line,
                "signal"
            );
        }
        Ok(())
    }
}

/// Keeps the most recent records in memory, newest last.
pub struct MemorySink {
    records: Mutex<Vec<SignalRecord>>,
    capacity: usize,
}

impl MemorySink {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn records(&self) -> Vec<SignalRecord> {
        self.records.lock().clone()
    }
}

impl SignalSink for MemorySink {
    fn publish(&self, record: &SignalRecord) -> Result<()> {
        let mut records = self.records.lock();
        records.push(record.clone());
        let excess = records.len().saturating_sub(self.capacity);
        records.drain(..excess);
        Ok(())
    }
}
