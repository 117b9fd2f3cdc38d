// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ).  σ is the population standard deviation over
// the same trailing window the SMA uses (divide by `period`, not period - 1).

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, IndicatorResult};

use super::sma::sma_values;
use super::util::{check_period, check_prices, population_variance};
use super::Series;

pub const BOLLINGER_DEFAULT_PERIOD: usize = 20;
pub const BOLLINGER_DEFAULT_STD_DEV: f64 = 2.0;

/// Result of a Bollinger Band calculation: three series aligned with the
/// input prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerResult {
    pub middle: Series,
    pub upper: Series,
    pub lower: Series,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// - `middle` = SMA(`period`)
/// - `upper`  = middle + `std_dev_multiplier` * σ
/// - `lower`  = middle - `std_dev_multiplier` * σ
///
/// All three are `None` for indices before `period - 1`.
///
/// # Errors
/// - `period == 0`
/// - `std_dev_multiplier` negative or non-finite
/// - empty input or non-finite price
pub fn compute_bollinger(
    prices: &[f64],
    period: usize,
    std_dev_multiplier: f64,
) -> IndicatorResult<BollingerResult> {
    check_period("period", period)?;
    if !std_dev_multiplier.is_finite() || std_dev_multiplier < 0.0 {
        return Err(IndicatorError::invalid(
            "std_dev_multiplier",
            format!("must be finite and non-negative, got {std_dev_multiplier}"),
        ));
    }
    check_prices(prices)?;

    let middle = sma_values(prices, period);
    let mut upper = vec![None; prices.len()];
    let mut lower = vec![None; prices.len()];

    for (offset, window) in prices.windows(period).enumerate() {
        let i = offset + period - 1;
        let Some(mean) = middle[i] else { continue };
        let std_dev = population_variance(window, mean).sqrt();
        upper[i] = Some(mean + std_dev_multiplier * std_dev);
        lower[i] = Some(mean - std_dev_multiplier * std_dev);
    }

    Ok(BollingerResult {
        middle,
        upper,
        lower,
    })
}
