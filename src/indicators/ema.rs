// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The very first EMA value (index `period - 1`) is seeded with the SMA of the
// first `period` closes.  Every downstream EMA-derived value depends on this
// seed, so it must not be replaced by a first-sample seed.
// =============================================================================

use crate::error::IndicatorResult;

use super::util::{check_period, check_prices, left_pad, mean};
use super::Series;

/// Compute the EMA series for `prices` and look-back `period`.
///
/// The output is aligned with `prices`; indices `0..period - 1` are `None`.
///
/// # Edge cases
/// - `period == 0` => `InvalidParameter`
/// - `prices.len() < period` => all `None`
/// - `period == 1` => the EMA equals the input
pub fn compute_ema(prices: &[f64], period: usize) -> IndicatorResult<Series> {
    check_period("period", period)?;
    check_prices(prices)?;
    Ok(ema_values(prices, period))
}

/// Unchecked EMA kernel.  Also used by MACD on the defined suffix of the MACD
/// line, which may be empty.
pub(crate) fn ema_values(prices: &[f64], period: usize) -> Series {
    if period == 0 || prices.len() < period {
        return vec![None; prices.len()];
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let seed = mean(&prices[..period]);

    let mut values = Vec::with_capacity(prices.len() - period + 1);
    values.push(Some(seed));

    let mut prev = seed;
    for &close in &prices[period..] {
        prev = (close - prev) * multiplier + prev;
        values.push(Some(prev));
    }

    left_pad(values, prices.len())
}
