// =============================================================================
// Strategy Engine — feed -> buffer -> signal -> sink
// =============================================================================
//
// Runs one refresh or evaluation cycle over every configured symbol:
//
//   refresh:   fetch candles from the feed, merge them into the rolling buffer
//   evaluate:  snapshot the buffer, generate a signal, hand a record to the
//              sink, and raise an alert when confidence clears the threshold
//
// Failures are per symbol: a bad feed read or malformed candle is logged and
// that symbol skips the cycle; the others carry on.
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::feed::{CandleFeed, SignalSink};
use crate::market_data::CandleBuffer;
use crate::runtime_config::RuntimeConfig;
use crate::signals::{generate_signal_with, SignalRecord};

pub struct StrategyEngine {
    config: RuntimeConfig,
    buffer: Arc<CandleBuffer>,
    feed: Arc<dyn CandleFeed>,
    sink: Arc<dyn SignalSink>,
}

impl StrategyEngine {
    pub fn new(
        config: RuntimeConfig,
        buffer: Arc<CandleBuffer>,
        feed: Arc<dyn CandleFeed>,
        sink: Arc<dyn SignalSink>,
    ) -> Self {
        Self {
            config,
            buffer,
            feed,
            sink,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Pull fresh candles for every symbol in one feed round.  Returns the
    /// number of new bars.
    ///
    /// Blocks on feed I/O; async callers should run it on a blocking thread.
    pub fn refresh(&self) -> usize {
        let mut appended = 0;
        for (symbol, fetched) in self.feed.fetch_many(&self.config.symbols) {
            match fetched {
                Ok(candles) => appended += self.buffer.extend(&symbol, candles),
                Err(e) => warn!(symbol = %symbol, error = %e, "candle refresh failed"),
            }
        }
        appended
    }

    /// Evaluate one symbol against the buffered history.
    ///
    /// Returns `Ok(None)` when nothing is buffered yet.
    pub fn evaluate_symbol(&self, symbol: &str) -> Result<Option<SignalRecord>> {
        let candles = self.buffer.snapshot(symbol);
        let Some(last) = candles.last() else {
            debug!(symbol = %symbol, "no candles buffered yet");
            return Ok(None);
        };
        let price = last.close;

        let signal = generate_signal_with(&candles, &self.config.signal)
            .with_context(|| format!("signal generation failed for {symbol}"))?;

        let record = SignalRecord::new(symbol, price, &signal);
        self.sink
            .publish(&record)
            .with_context(|| format!("failed to publish signal for {symbol}"))?;

        if signal.is_actionable(self.config.alert_confidence) {
            info!(
                symbol = %symbol,
                signal = %signal.kind,
                confidence = signal.confidence,
                price,
                "ALERT: high-confidence signal"
            );
        }

        Ok(Some(record))
    }

    /// Evaluate every symbol once.  Does nothing while the bot is inactive.
    pub fn run_cycle(&self) -> Vec<SignalRecord> {
        if !self.config.bot_active {
            debug!("bot inactive; skipping evaluation cycle");
            return Vec::new();
        }

        let mut records = Vec::with_capacity(self.config.symbols.len());
        for symbol in &self.config.symbols {
            match self.evaluate_symbol(symbol) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!(symbol = %symbol, error = %e, "skipping symbol this cycle"),
            }
        }
        records
    }
}
