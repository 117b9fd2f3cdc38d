// =============================================================================
// Chart Overlay — per-candle indicator rows for the presentation layer
// =============================================================================
//
// The dashboard draws price with SMA-20 / SMA-50, the Bollinger envelope, RSI
// and MACD panes.  This module joins every series onto its candle so the
// renderer receives one row per bar and never re-aligns anything itself.
// =============================================================================

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::IndicatorResult;
use crate::indicators::{
    compute_bollinger, compute_macd, compute_rsi, compute_sma, BOLLINGER_DEFAULT_PERIOD,
    BOLLINGER_DEFAULT_STD_DEV, MACD_DEFAULT_FAST, MACD_DEFAULT_SIGNAL, MACD_DEFAULT_SLOW,
    RSI_DEFAULT_PERIOD,
};
use crate::types::{closes, validate_candles, Candle};

const SHORT_SMA_PERIOD: usize = 20;
const LONG_SMA_PERIOD: usize = 50;

/// One chart row: the candle plus every overlay value at that index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRow {
    pub timestamp: i64,
    /// `HH:MM` (UTC) label for the x axis.
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub price: f64,
    pub volume: f64,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
}

/// Rows plus the headline price move over the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOverlay {
    pub rows: Vec<OverlayRow>,
    pub last_price: f64,
    /// Last close minus first close; 0 with fewer than two candles.
    pub price_change: f64,
    /// `price_change` as a percentage of the first close; 0 when the first
    /// close is zero or there are fewer than two candles.
    pub price_change_pct: f64,
}

/// Build the overlay for `candles` with the dashboard's default periods.
pub fn chart_overlay(candles: &[Candle]) -> IndicatorResult<ChartOverlay> {
    validate_candles(candles)?;
    let closes = closes(candles);

    let sma20 = compute_sma(&closes, SHORT_SMA_PERIOD)?;
    let sma50 = compute_sma(&closes, LONG_SMA_PERIOD)?;
    let rsi = compute_rsi(&closes, RSI_DEFAULT_PERIOD)?;
    let macd = compute_macd(&closes, MACD_DEFAULT_FAST, MACD_DEFAULT_SLOW, MACD_DEFAULT_SIGNAL)?;
    let bb = compute_bollinger(&closes, BOLLINGER_DEFAULT_PERIOD, BOLLINGER_DEFAULT_STD_DEV)?;

    let rows = candles
        .iter()
        .enumerate()
        .map(|(i, c)| OverlayRow {
            timestamp: c.timestamp,
            time: time_label(c.timestamp),
            open: c.open,
            high: c.high,
            low: c.low,
            price: c.close,
            volume: c.volume,
            sma20: sma20[i],
            sma50: sma50[i],
            rsi: rsi[i],
            macd: macd.macd_line[i],
            signal: macd.signal_line[i],
            bb_upper: bb.upper[i],
            bb_middle: bb.middle[i],
            bb_lower: bb.lower[i],
        })
        .collect();

    let first = closes[0];
    let last_price = closes[closes.len() - 1];
    let price_change = if closes.len() > 1 { last_price - first } else { 0.0 };
    let price_change_pct = if closes.len() > 1 && first != 0.0 {
        price_change / first * 100.0
    } else {
        0.0
    };

    Ok(ChartOverlay {
        rows,
        last_price,
        price_change,
        price_change_pct,
    })
}

fn time_label(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle {
                timestamp: 1_700_000_000_000 + i as i64 * 300_000,
                open: c,
                high: c + 0.5,
                low: c - 0.5,
                close: c,
                volume: 500_000.0,
            })
            .collect()
    }

    #[test]
    fn rows_align_with_candles() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 7) as f64).collect();
        let overlay = chart_overlay(&candles(&closes)).unwrap();
        assert_eq!(overlay.rows.len(), 60);
        assert!(overlay.rows[18].sma20.is_none());
        assert!(overlay.rows[19].sma20.is_some());
        assert!(overlay.rows[48].sma50.is_none());
        assert!(overlay.rows[49].sma50.is_some());
        assert!(overlay.rows[33].signal.is_some());
        assert_eq!(overlay.rows[59].price, closes[59]);
    }

    #[test]
    fn price_change_over_window() {
        let overlay = chart_overlay(&candles(&[100.0, 90.0, 110.0])).unwrap();
        assert!((overlay.last_price - 110.0).abs() < 1e-12);
        assert!((overlay.price_change - 10.0).abs() < 1e-12);
        assert!((overlay.price_change_pct - 10.0).abs() < 1e-12);
    }

    #[test]
    fn single_candle_has_no_change() {
        let overlay = chart_overlay(&candles(&[42.0])).unwrap();
        assert_eq!(overlay.price_change, 0.0);
        assert_eq!(overlay.price_change_pct, 0.0);
        assert!(overlay.rows[0].rsi.is_none());
    }

    #[test]
    fn time_label_is_utc_clock() {
        // 2023-11-14T22:13:20Z
        assert_eq!(time_label(1_700_000_000_000), "22:13");
    }

    #[test]
    fn empty_candles_rejected() {
        assert!(chart_overlay(&[]).is_err());
    }
}
