// =============================================================================
// Relative Strength Index (RSI) — rolling-window averages
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes and split
//          them into gains (delta > 0) and losses (-delta for delta < 0).
// Step 2 — For output index i >= period, average gain / average loss are the
//          plain means of the `period` most recent gains / losses that end at
//          price i.  There is no Wilder smoothing; each window stands alone.
// Step 3 — avg_loss == 0  => RSI = 100 (this also covers a flat window)
//          otherwise        RS = avg_gain / avg_loss, RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI > 70 => overbought,  RSI < 30 => oversold.
// =============================================================================

use crate::error::IndicatorResult;

use super::util::{check_period, check_prices, left_pad, mean};
use super::Series;

/// Conventional RSI look-back.
pub const RSI_DEFAULT_PERIOD: usize = 14;

/// Compute the full RSI series for `prices` and `period`.
///
/// The returned vector is aligned with `prices`.  Indices `0..period` are
/// `None`: the first defined value needs `period` deltas, i.e. `period + 1`
/// prices.
///
/// # Edge cases
/// - `period == 0` => `InvalidParameter`
/// - `prices.len() <= period` => all `None`
/// - Average loss of zero => exactly 100.0, even with zero gains.
pub fn compute_rsi(prices: &[f64], period: usize) -> IndicatorResult<Series> {
    check_period("period", period)?;
    check_prices(prices)?;

    // --- Gains / losses per step (length N - 1) -----------------------------
    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            if delta > 0.0 {
                (delta, 0.0)
            } else if delta < 0.0 {
                (0.0, -delta)
            } else {
                (0.0, 0.0)
            }
        })
        .unzip();

    // Window k covers deltas k..k+period and maps to price index k + period.
    let values = gains
        .windows(period)
        .zip(losses.windows(period))
        .map(|(g, l)| Some(rsi_from_averages(mean(g), mean(l))));

    Ok(left_pad(values, prices.len()))
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|x| x as f64).collect()
    }

    #[test]
    fn rsi_empty_input() {
        assert!(compute_rsi(&[], 14).is_err());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(compute_rsi(&[1.0, 2.0, 3.0], 0).is_err());
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 deltas < 14, nothing defined.
        let rsi = compute_rsi(&ascending(14), 14).unwrap();
        assert_eq!(rsi.len(), 14);
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_first_defined_index_is_period() {
        let rsi = compute_rsi(&ascending(15), 14).unwrap();
        assert!(rsi[..14].iter().all(Option::is_none));
        assert!(rsi[14].is_some());
    }

    #[test]
    fn rsi_all_gains() {
        // Strictly ascending prices => RSI should be 100.
        let rsi = compute_rsi(&ascending(30), 14).unwrap();
        for v in rsi.iter().skip(14) {
            assert_eq!(*v, Some(100.0));
        }
    }

    #[test]
    fn rsi_all_losses() {
        // Strictly descending prices => RSI should be 0.
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let rsi = compute_rsi(&closes, 14).unwrap();
        for v in rsi.iter().skip(14) {
            assert!(v.unwrap().abs() < 1e-10, "expected 0.0, got {v:?}");
        }
    }

    #[test]
    fn rsi_flat_market_hits_zero_loss_branch() {
        // No losses and no gains: the zero-average-loss boundary still fires.
        let rsi = compute_rsi(&[100.0; 30], 14).unwrap();
        for v in rsi.iter().skip(14) {
            assert_eq!(*v, Some(100.0));
        }
    }

    #[test]
    fn rsi_uses_plain_rolling_window() {
        // Period 2 over [1, 2, 1, 3]: deltas +1, -1, +2.
        // Index 2: gains [1, 0], losses [0, 1] => RS = 1 => 50.
        // Index 3: gains [0, 2], losses [1, 0] => RS = 2 => 66.666...
        let rsi = compute_rsi(&[1.0, 2.0, 1.0, 3.0], 2).unwrap();
        assert_eq!(&rsi[..2], &[None, None]);
        assert!((rsi[2].unwrap() - 50.0).abs() < 1e-10);
        assert!((rsi[3].unwrap() - 200.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_hundred_only_without_losses() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let period = 5;
        let rsi = compute_rsi(&closes, period).unwrap();
        for i in period..closes.len() {
            let v = rsi[i].unwrap();
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
            let any_loss = closes[i - period..=i].windows(2).any(|w| w[1] < w[0]);
            assert_eq!(v == 100.0, !any_loss, "index {i}");
        }
    }
}
