// =============================================================================
// Shared numeric helpers for the indicator transforms
// =============================================================================

use crate::error::{IndicatorError, IndicatorResult};

use super::Series;

/// Reject a zero look-back period.
pub(crate) fn check_period(name: &'static str, period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::invalid(name, "must be at least 1"));
    }
    Ok(())
}

/// Reject empty input and any NaN / infinite price.
pub(crate) fn check_prices(prices: &[f64]) -> IndicatorResult<()> {
    if prices.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }
    match prices.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(IndicatorError::NonFinitePrice { index }),
        None => Ok(()),
    }
}

/// Arithmetic mean of a non-empty window.
pub(crate) fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Population variance of `window` around `mean` (divides by the window
/// length, not length - 1).
pub(crate) fn population_variance(window: &[f64], mean: f64) -> f64 {
    window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window.len() as f64
}

/// Prefix `values` with `None` until the result is `len` long.
pub(crate) fn left_pad(values: impl IntoIterator<Item = Option<f64>>, len: usize) -> Series {
    let values: Series = values.into_iter().collect();
    let missing = len.saturating_sub(values.len());
    let mut out = Vec::with_capacity(len.max(values.len()));
    out.extend(std::iter::repeat(None).take(missing));
    out.extend(values);
    out
}

/// Elementwise `a - b`; `None` wherever either side is undefined.
pub(crate) fn zip_sub(a: &[Option<f64>], b: &[Option<f64>]) -> Series {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(x - y),
            _ => None,
        })
        .collect()
}

/// Most recent value of a series, `None` when the series is empty or its last
/// entry is undefined.
pub fn last_defined(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}
