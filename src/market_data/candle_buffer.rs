use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::types::Candle;

// ---------------------------------------------------------------------------
// CandleBuffer -- thread-safe rolling window per symbol
// ---------------------------------------------------------------------------

/// What the buffer did with an incoming candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// A new bar was appended (oldest bars trimmed if over capacity).
    Appended,
    /// The in-progress bar with the same timestamp was replaced.
    Replaced,
    /// The candle was not newer than what is buffered and was dropped.
    Stale,
}

/// Thread-safe rolling buffer holding the most recent candles per symbol.
///
/// The signal engine is pure and never touches this buffer; the poller owns
/// it and takes a snapshot under the read lock before every evaluation.
/// Every mutation, including bulk `extend` and `replace`, happens under a
/// single write guard, so a snapshot never observes a half-applied update.
pub struct CandleBuffer {
    buffers: RwLock<HashMap<String, VecDeque<Candle>>>,
    max_candles: usize,
}

/// Merge `candle` into `ring`: same timestamp replaces the last bar, newer
/// appends, older is reported stale and left out.
fn merge_into(ring: &mut VecDeque<Candle>, candle: Candle, max_candles: usize) -> PushOutcome {
    let outcome = match ring.back().map(|c| c.timestamp) {
        Some(last) if candle.timestamp < last => return PushOutcome::Stale,
        Some(last) if candle.timestamp == last => {
            ring.pop_back();
            PushOutcome::Replaced
        }
        _ => PushOutcome::Appended,
    };

    ring.push_back(candle);
    // Trim oldest to stay within budget.
    while ring.len() > max_candles {
        ring.pop_front();
    }
    outcome
}

impl CandleBuffer {
    /// Create a new buffer that retains at most `max_candles` candles per
    /// symbol (at least one).
    pub fn new(max_candles: usize) -> Self {
        Self {
            buffers: RwLock::new(HashMap::new()),
            max_candles: max_candles.max(1),
        }
    }

    fn new_ring(&self) -> VecDeque<Candle> {
        VecDeque::with_capacity(self.max_candles + 1)
    }

    /// Append a closed bar for `symbol`, trimming the oldest past capacity.
    ///
    /// A candle that is not strictly newer than the last bar is dropped as
    /// `Stale`; use `update_last` for the forming bar.
    pub fn push(&self, symbol: &str, candle: Candle) -> PushOutcome {
        let mut map = self.buffers.write();
        let ring = map
            .entry(symbol.to_string())
            .or_insert_with(|| self.new_ring());

        if let Some(last) = ring.back().map(|c| c.timestamp) {
            if candle.timestamp <= last {
                warn!(
                    symbol = %symbol,
                    timestamp = candle.timestamp,
                    last,
                    "dropping candle not newer than buffered tail"
                );
                return PushOutcome::Stale;
            }
        }
        merge_into(ring, candle, self.max_candles)
    }

    /// Replace the in-progress last bar when `candle` carries its timestamp,
    /// otherwise append it.  Older candles are dropped.
    pub fn update_last(&self, symbol: &str, candle: Candle) -> PushOutcome {
        let mut map = self.buffers.write();
        let ring = map
            .entry(symbol.to_string())
            .or_insert_with(|| self.new_ring());

        let outcome = merge_into(ring, candle, self.max_candles);
        if outcome == PushOutcome::Stale {
            warn!(symbol = %symbol, timestamp = candle.timestamp, "dropping out-of-order candle");
        }
        outcome
    }

    /// Merge a polled history into `symbol` and return how many bars were
    /// appended.
    ///
    /// Feeds hand back their whole window on every poll, so bars older than
    /// the buffered tail are expected here and skipped quietly.
    pub fn extend(&self, symbol: &str, candles: impl IntoIterator<Item = Candle>) -> usize {
        let mut map = self.buffers.write();
        let ring = map
            .entry(symbol.to_string())
            .or_insert_with(|| self.new_ring());

        let (mut appended, mut skipped) = (0, 0);
        for candle in candles {
            match merge_into(ring, candle, self.max_candles) {
                PushOutcome::Appended => appended += 1,
                PushOutcome::Replaced => {}
                PushOutcome::Stale => skipped += 1,
            }
        }
        debug!(symbol = %symbol, appended, skipped, "candles merged");
        appended
    }

    /// Drop whatever is stored for `symbol` and load `candles` instead.
    pub fn replace(&self, symbol: &str, candles: Vec<Candle>) {
        let mut ring = self.new_ring();
        let skipped = candles
            .into_iter()
            .filter(|c| merge_into(&mut ring, *c, self.max_candles) == PushOutcome::Stale)
            .count();
        if skipped > 0 {
            warn!(symbol = %symbol, skipped, "out-of-order candles left out of replacement");
        }
        self.buffers.write().insert(symbol.to_string(), ring);
    }

    /// Fold a live trade into the forming (last) bar: the close moves to
    /// `price`, high / low stretch to include it, and `volume` is added.
    ///
    /// Returns the updated bar, or `None` when nothing is buffered for
    /// `symbol` or the tick is not finite.
    pub fn apply_tick(&self, symbol: &str, price: f64, volume: f64) -> Option<Candle> {
        if !price.is_finite() || !volume.is_finite() || volume < 0.0 {
            warn!(symbol = %symbol, price, volume, "ignoring malformed tick");
            return None;
        }
        let mut map = self.buffers.write();
        let last = map.get_mut(symbol)?.back_mut()?;
        last.close = price;
        last.high = last.high.max(price);
        last.low = last.low.min(price);
        last.volume += volume;
        Some(*last)
    }

    /// Copy of every buffered candle for `symbol` (oldest first).
    pub fn snapshot(&self, symbol: &str) -> Vec<Candle> {
        let map = self.buffers.read();
        map.get(symbol)
            .map(|ring| ring.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Close prices for `symbol` (oldest first).
    pub fn closes(&self, symbol: &str) -> Vec<f64> {
        let map = self.buffers.read();
        map.get(symbol)
            .map(|ring| ring.iter().map(|c| c.close).collect())
            .unwrap_or_default()
    }

    /// Close price of the most recent candle, if any.
    pub fn last_close(&self, symbol: &str) -> Option<f64> {
        let map = self.buffers.read();
        map.get(symbol).and_then(|ring| ring.back().map(|c| c.close))
    }

    /// Number of candles stored for `symbol`.
    pub fn len(&self, symbol: &str) -> usize {
        let map = self.buffers.read();
        map.get(symbol).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, symbol: &str) -> bool {
        self.len(symbol) == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
