// =============================================================================
// Shared types used across the Aurora signal engine
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, IndicatorResult};

/// A single OHLCV observation produced by the price feed.
///
/// Candles are immutable once created and ordered by non-decreasing
/// `timestamp` (epoch millis).  The engine assumes index order equals
/// chronological order and never requires a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    /// Check `low <= min(open, close) <= max(open, close) <= high`, finiteness
    /// and `volume >= 0`.
    pub fn check(&self) -> Result<(), String> {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err("non-finite OHLCV field".to_string());
        }
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if self.low > body_low {
            return Err(format!("low {} above body {}", self.low, body_low));
        }
        if self.high < body_high {
            return Err(format!("high {} below body {}", self.high, body_high));
        }
        if self.volume < 0.0 {
            return Err(format!("negative volume {}", self.volume));
        }
        Ok(())
    }
}

/// Validate a whole candle sequence: non-empty, every candle well-formed, and
/// timestamps non-decreasing.
pub fn validate_candles(candles: &[Candle]) -> IndicatorResult<()> {
    if candles.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }

    for (index, candle) in candles.iter().enumerate() {
        candle
            .check()
            .map_err(|reason| IndicatorError::InvalidCandle { index, reason })?;
    }

    if let Some(index) = candles
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        return Err(IndicatorError::InvalidCandle {
            index: index + 1,
            reason: "timestamp earlier than previous candle".to_string(),
        });
    }

    Ok(())
}

/// Closing prices of `candles`, oldest first.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Discrete trading decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

impl Default for SignalKind {
    fn default() -> Self {
        Self::Hold
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
            Self::Hold => write!(f, "hold"),
        }
    }
}
