// =============================================================================
// Aurora Signals — technical-indicator and signal-generation engine
// =============================================================================
//
// A pure pipeline: candles -> indicator series -> latest snapshot -> signal.
// Nothing in `indicators` or `signals` holds state between calls, performs
// I/O or touches shared data; concurrent callers need no coordination.  The
// candle buffer, feed and sink modules are the caller-side plumbing the demo
// poller uses around it.
// =============================================================================

pub mod error;
pub mod feed;
pub mod indicators;
pub mod market_data;
pub mod overlay;
pub mod runtime_config;
pub mod signals;
pub mod strategy;
pub mod types;

pub use error::{IndicatorError, IndicatorResult};
pub use indicators::{
    compute_bollinger, compute_ema, compute_indicator_set, compute_macd, compute_rsi,
    compute_sma, BollingerResult, IndicatorParams, IndicatorSet, MacdResult, Series,
};
pub use overlay::{chart_overlay, ChartOverlay, OverlayRow};
pub use signals::{
    decide, generate_signal, generate_signal_with, IndicatorSnapshot, Signal, SignalConfig,
    SignalRecord, SignalRules,
};
pub use types::{Candle, SignalKind};
