// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators used by
// the signal generator.  Every series is aligned index-for-index with its
// input prices; `None` marks positions whose look-back window has not filled.
//
// Dependency order: SMA, EMA and RSI read prices directly; MACD is built on
// EMA; Bollinger Bands are built on SMA.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod util;

use serde::{Deserialize, Serialize};

use crate::error::IndicatorResult;

pub use bollinger::{
    compute_bollinger, BollingerResult, BOLLINGER_DEFAULT_PERIOD, BOLLINGER_DEFAULT_STD_DEV,
};
pub use ema::compute_ema;
pub use macd::{
    compute_macd, MacdResult, MACD_DEFAULT_FAST, MACD_DEFAULT_SIGNAL, MACD_DEFAULT_SLOW,
};
pub use rsi::{compute_rsi, RSI_DEFAULT_PERIOD};
pub use sma::compute_sma;
pub use util::last_defined;

/// An indicator series.  `None` means "insufficient history" and is never a
/// comparable value; it serialises as `null`.
pub type Series = Vec<Option<f64>>;

fn default_rsi_period() -> usize {
    RSI_DEFAULT_PERIOD
}

fn default_macd_fast() -> usize {
    MACD_DEFAULT_FAST
}

fn default_macd_slow() -> usize {
    MACD_DEFAULT_SLOW
}

fn default_macd_signal() -> usize {
    MACD_DEFAULT_SIGNAL
}

fn default_bb_period() -> usize {
    BOLLINGER_DEFAULT_PERIOD
}

fn default_bb_std_dev() -> f64 {
    BOLLINGER_DEFAULT_STD_DEV
}

/// Look-back parameters for the indicators feeding the signal generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bb_period")]
    pub bb_period: usize,

    /// Standard-deviation multiplier for the Bollinger envelope.
    #[serde(default = "default_bb_std_dev")]
    pub bb_std_dev: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bb_period: default_bb_period(),
            bb_std_dev: default_bb_std_dev(),
        }
    }
}

/// RSI, MACD and Bollinger series computed over one price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi: Series,
    pub macd: MacdResult,
    pub bollinger: BollingerResult,
}

/// Run every indicator the signal generator needs over `closes`.
pub fn compute_indicator_set(
    closes: &[f64],
    params: &IndicatorParams,
) -> IndicatorResult<IndicatorSet> {
    Ok(IndicatorSet {
        rsi: compute_rsi(closes, params.rsi_period)?,
        macd: compute_macd(
            closes,
            params.macd_fast,
            params.macd_slow,
            params.macd_signal,
        )?,
        bollinger: compute_bollinger(closes, params.bb_period, params.bb_std_dev)?,
    })
}
