// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   macd_line   = EMA(fast) - EMA(slow)
//   signal_line = EMA(signal) over the defined suffix of macd_line, then
//                 left-padded with `None` back to the input length
//   histogram   = macd_line - signal_line
//
// Running the signal EMA across the undefined head of the MACD line would
// poison its SMA seed, so the head is skipped and alignment restored after.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::IndicatorResult;

use super::ema::ema_values;
use super::util::{check_period, check_prices, left_pad, zip_sub};
use super::Series;

pub const MACD_DEFAULT_FAST: usize = 12;
pub const MACD_DEFAULT_SLOW: usize = 26;
pub const MACD_DEFAULT_SIGNAL: usize = 9;

/// Three index-aligned series, each as long as the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd_line: Series,
    pub signal_line: Series,
    pub histogram: Series,
}

/// Compute MACD over `prices`.
///
/// # Errors
/// Any zero period, empty input or non-finite price.
pub fn compute_macd(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> IndicatorResult<MacdResult> {
    check_period("fast_period", fast_period)?;
    check_period("slow_period", slow_period)?;
    check_period("signal_period", signal_period)?;
    check_prices(prices)?;

    let fast = ema_values(prices, fast_period);
    let slow = ema_values(prices, slow_period);
    let macd_line = zip_sub(&fast, &slow);

    // The defined entries of `macd_line` are a contiguous suffix.
    let defined: Vec<f64> = macd_line.iter().flatten().copied().collect();
    let signal_line = left_pad(ema_values(&defined, signal_period), prices.len());

    let histogram = zip_sub(&macd_line, &signal_line);

    Ok(MacdResult {
        macd_line,
        signal_line,
        histogram,
    })
}
