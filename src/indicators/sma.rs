// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted mean over a trailing window:
//   SMA_i = (close_{i-P+1} + ... + close_i) / P        for i >= P - 1
//
// Positions 0..P-2 carry `None`.
// =============================================================================

use crate::error::IndicatorResult;

use super::util::{check_period, check_prices, left_pad, mean};
use super::Series;

/// Compute the SMA series for `prices` over `period`.
///
/// The output has the same length as `prices`.  A series shorter than
/// `period` yields all `None`.
///
/// # Errors
/// - `period == 0` => `InvalidParameter`
/// - empty input => `EmptyInput`
/// - NaN / infinite price => `NonFinitePrice`
pub fn compute_sma(prices: &[f64], period: usize) -> IndicatorResult<Series> {
    check_period("period", period)?;
    check_prices(prices)?;
    Ok(sma_values(prices, period))
}

/// Unchecked SMA kernel shared with Bollinger Bands.
pub(crate) fn sma_values(prices: &[f64], period: usize) -> Series {
    left_pad(prices.windows(period).map(|w| Some(mean(w))), prices.len())
}
