// =============================================================================
// Signal Generator — RSI + MACD + Bollinger decision table
// =============================================================================
//
// Rules are evaluated top to bottom; the first match wins:
//
//   1. RSI < 30 && MACD > signal && close < lower band  => BUY  (0.85)
//   2. RSI < 40 && MACD > signal                        => BUY  (0.65)
//   3. RSI > 70 && MACD < signal && close > upper band  => SELL (0.85)
//   4. RSI > 60 && MACD < signal                        => SELL (0.65)
//   5. otherwise                                        => HOLD (0.0)
//
// Any undefined or non-finite input short-circuits to HOLD with zero
// confidence before a single comparison is made.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IndicatorError, IndicatorResult};
use crate::indicators::{compute_indicator_set, last_defined, IndicatorParams, IndicatorSet};
use crate::types::{closes, validate_candles, Candle, SignalKind};

// =============================================================================
// Configuration
// =============================================================================

fn default_strong_oversold() -> f64 {
    30.0
}

fn default_oversold() -> f64 {
    40.0
}

fn default_strong_overbought() -> f64 {
    70.0
}

fn default_overbought() -> f64 {
    60.0
}

fn default_strong_confidence() -> f64 {
    0.85
}

fn default_weak_confidence() -> f64 {
    0.65
}

/// Thresholds and confidences of the decision table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRules {
    /// RSI below this plus a close under the lower band is a strong buy.
    #[serde(default = "default_strong_oversold")]
    pub strong_oversold: f64,

    #[serde(default = "default_oversold")]
    pub oversold: f64,

    /// RSI above this plus a close over the upper band is a strong sell.
    #[serde(default = "default_strong_overbought")]
    pub strong_overbought: f64,

    #[serde(default = "default_overbought")]
    pub overbought: f64,

    #[serde(default = "default_strong_confidence")]
    pub strong_confidence: f64,

    #[serde(default = "default_weak_confidence")]
    pub weak_confidence: f64,
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            strong_oversold: default_strong_oversold(),
            oversold: default_oversold(),
            strong_overbought: default_strong_overbought(),
            overbought: default_overbought(),
            strong_confidence: default_strong_confidence(),
            weak_confidence: default_weak_confidence(),
        }
    }
}

impl SignalRules {
    /// Reject non-finite thresholds and confidences outside [0, 1].
    pub fn validate(&self) -> IndicatorResult<()> {
        let thresholds = [
            ("strong_oversold", self.strong_oversold),
            ("oversold", self.oversold),
            ("strong_overbought", self.strong_overbought),
            ("overbought", self.overbought),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(IndicatorError::invalid(name, format!("not finite: {value}")));
            }
        }

        let confidences = [
            ("strong_confidence", self.strong_confidence),
            ("weak_confidence", self.weak_confidence),
        ];
        for (name, value) in confidences {
            if !(0.0..=1.0).contains(&value) {
                return Err(IndicatorError::invalid(
                    name,
                    format!("must be within [0, 1], got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Everything the generator needs besides the candles themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    #[serde(default)]
    pub params: IndicatorParams,

    #[serde(default)]
    pub rules: SignalRules,
}

// =============================================================================
// Snapshot & Signal
// =============================================================================

/// Latest value of each decision input.  `None` means insufficient history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub close: Option<f64>,
}

impl IndicatorSnapshot {
    /// Take the most recent entry of every series in `set`.
    ///
    /// # Errors
    /// `LengthMismatch` when any series in `set` is not aligned with `closes`.
    pub fn from_set(set: &IndicatorSet, closes: &[f64]) -> IndicatorResult<Self> {
        let series = [
            &set.rsi,
            &set.macd.macd_line,
            &set.macd.signal_line,
            &set.bollinger.upper,
            &set.bollinger.lower,
        ];
        if let Some(bad) = series.iter().find(|s| s.len() != closes.len()) {
            return Err(IndicatorError::LengthMismatch {
                expected: closes.len(),
                actual: bad.len(),
            });
        }

        Ok(Self {
            rsi: last_defined(&set.rsi),
            macd: last_defined(&set.macd.macd_line),
            signal_line: last_defined(&set.macd.signal_line),
            bb_upper: last_defined(&set.bollinger.upper),
            bb_lower: last_defined(&set.bollinger.lower),
            close: closes.last().copied(),
        })
    }

    /// All six inputs, only when every one of them is defined and finite.
    fn complete(&self) -> Option<[f64; 6]> {
        let values = [
            self.rsi?,
            self.macd?,
            self.signal_line?,
            self.bb_upper?,
            self.bb_lower?,
            self.close?,
        ];
        values.iter().all(|v| v.is_finite()).then_some(values)
    }
}

/// A trading signal derived fresh on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// Always within [0, 1].
    pub confidence: f64,
    pub snapshot: IndicatorSnapshot,
}

impl Signal {
    /// Whether the signal is a buy/sell strictly more confident than
    /// `threshold`.
    pub fn is_actionable(&self, threshold: f64) -> bool {
        self.kind != SignalKind::Hold && self.confidence > threshold
    }
}

// =============================================================================
// Decision
// =============================================================================

/// Apply the decision table to `snapshot`.
pub fn decide(snapshot: &IndicatorSnapshot, rules: &SignalRules) -> (SignalKind, f64) {
    let Some([rsi, macd, signal_line, bb_upper, bb_lower, close]) = snapshot.complete() else {
        return (SignalKind::Hold, 0.0);
    };

    if rsi < rules.strong_oversold && macd > signal_line && close < bb_lower {
        (SignalKind::Buy, rules.strong_confidence)
    } else if rsi < rules.oversold && macd > signal_line {
        (SignalKind::Buy, rules.weak_confidence)
    } else if rsi > rules.strong_overbought && macd < signal_line && close > bb_upper {
        (SignalKind::Sell, rules.strong_confidence)
    } else if rsi > rules.overbought && macd < signal_line {
        (SignalKind::Sell, rules.weak_confidence)
    } else {
        (SignalKind::Hold, 0.0)
    }
}

/// Generate a signal from `candles` with the default indicator periods and
/// decision thresholds.
pub fn generate_signal(candles: &[Candle]) -> IndicatorResult<Signal> {
    generate_signal_with(candles, &SignalConfig::default())
}

/// Generate a signal from `candles` using `config`.
///
/// # Errors
/// Empty or malformed candles, or invalid periods / rules in `config`.
/// Short histories are not an error: they produce HOLD with confidence 0.
pub fn generate_signal_with(candles: &[Candle], config: &SignalConfig) -> IndicatorResult<Signal> {
    validate_candles(candles)?;
    config.rules.validate()?;

    let closes = closes(candles);
    let set = compute_indicator_set(&closes, &config.params)?;
    let snapshot = IndicatorSnapshot::from_set(&set, &closes)?;
    let (kind, confidence) = decide(&snapshot, &config.rules);

    debug!(
        candles = candles.len(),
        kind = %kind,
        confidence,
        rsi = ?snapshot.rsi,
        macd = ?snapshot.macd,
        signal_line = ?snapshot.signal_line,
        bb_upper = ?snapshot.bb_upper,
        bb_lower = ?snapshot.bb_lower,
        "signal evaluated"
    );

    Ok(Signal {
        kind,
        confidence,
        snapshot,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rsi: f64, macd: f64, signal_line: f64, close: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: Some(rsi),
            macd: Some(macd),
            signal_line: Some(signal_line),
            bb_upper: Some(110.0),
            bb_lower: Some(90.0),
            close: Some(close),
        }
    }

    fn candles_from(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle {
                timestamp: i as i64 * 300_000,
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1_000.0,
            })
            .collect()
    }

    // ---- decide ----------------------------------------------------------

    #[test]
    fn strong_buy() {
        let rules = SignalRules::default();
        assert_eq!(decide(&snapshot(25.0, 1.0, 0.5, 85.0), &rules), (SignalKind::Buy, 0.85));
    }

    #[test]
    fn weak_buy_when_close_inside_bands() {
        let rules = SignalRules::default();
        assert_eq!(decide(&snapshot(25.0, 1.0, 0.5, 100.0), &rules), (SignalKind::Buy, 0.65));
        assert_eq!(decide(&snapshot(35.0, 1.0, 0.5, 100.0), &rules), (SignalKind::Buy, 0.65));
    }

    #[test]
    fn strong_sell() {
        let rules = SignalRules::default();
        assert_eq!(decide(&snapshot(75.0, 0.5, 1.0, 115.0), &rules), (SignalKind::Sell, 0.85));
    }

    #[test]
    fn weak_sell() {
        let rules = SignalRules::default();
        assert_eq!(decide(&snapshot(65.0, 0.5, 1.0, 100.0), &rules), (SignalKind::Sell, 0.65));
    }

    #[test]
    fn hold_when_momentum_disagrees() {
        let rules = SignalRules::default();
        // Oversold but MACD below signal.
        assert_eq!(decide(&snapshot(25.0, 0.5, 1.0, 85.0), &rules), (SignalKind::Hold, 0.0));
        // Overbought but MACD above signal.
        assert_eq!(decide(&snapshot(75.0, 1.0, 0.5, 115.0), &rules), (SignalKind::Hold, 0.0));
        // MACD equal to signal never satisfies a strict comparison.
        assert_eq!(decide(&snapshot(25.0, 1.0, 1.0, 85.0), &rules), (SignalKind::Hold, 0.0));
    }

    #[test]
    fn thresholds_are_strict() {
        let rules = SignalRules::default();
        assert_eq!(decide(&snapshot(40.0, 1.0, 0.5, 100.0), &rules).0, SignalKind::Hold);
        assert_eq!(decide(&snapshot(60.0, 0.5, 1.0, 100.0), &rules).0, SignalKind::Hold);
    }

    #[test]
    fn undefined_input_holds() {
        let rules = SignalRules::default();
        let mut s = snapshot(25.0, 1.0, 0.5, 85.0);
        s.signal_line = None;
        assert_eq!(decide(&s, &rules), (SignalKind::Hold, 0.0));

        let mut s = snapshot(25.0, 1.0, 0.5, 85.0);
        s.rsi = Some(f64::NAN);
        assert_eq!(decide(&s, &rules), (SignalKind::Hold, 0.0));

        assert_eq!(decide(&IndicatorSnapshot::default(), &rules), (SignalKind::Hold, 0.0));
    }

    #[test]
    fn decision_table_is_total() {
        let rules = SignalRules::default();
        let rsis = [0.0, 20.0, 30.0, 35.0, 40.0, 50.0, 60.0, 65.0, 70.0, 80.0, 100.0];
        let macds = [(-1.0, 0.0), (0.0, 0.0), (1.0, 0.0)];
        let prices = [80.0, 90.0, 100.0, 110.0, 120.0];
        for rsi in rsis {
            for (macd, sig) in macds {
                for close in prices {
                    let (kind, confidence) = decide(&snapshot(rsi, macd, sig, close), &rules);
                    assert!([0.85, 0.65, 0.0].contains(&confidence));
                    assert_eq!(kind == SignalKind::Hold, confidence == 0.0);
                }
            }
        }
    }

    // ---- generate_signal -------------------------------------------------

    #[test]
    fn empty_candles_rejected() {
        assert_eq!(generate_signal(&[]), Err(IndicatorError::EmptyInput));
    }

    #[test]
    fn short_history_holds() {
        let signal = generate_signal(&candles_from(&[100.0; 10])).unwrap();
        assert_eq!(signal.kind, SignalKind::Hold);
        assert_eq!(signal.confidence, 0.0);
        assert!(signal.snapshot.signal_line.is_none());
        assert_eq!(signal.snapshot.close, Some(100.0));
    }

    #[test]
    fn rising_thirty_holds_without_signal_line() {
        // 30 closes: RSI = 100 but the MACD signal line needs 34 closes.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let signal = generate_signal(&candles_from(&closes)).unwrap();
        assert_eq!(signal.snapshot.rsi, Some(100.0));
        assert!(signal.snapshot.macd.is_some());
        assert!(signal.snapshot.signal_line.is_none());
        assert_eq!(signal.kind, SignalKind::Hold);
    }

    #[test]
    fn flat_market_holds() {
        // RSI pinned at 100 by the zero-loss branch, MACD == signal == 0.
        let signal = generate_signal(&candles_from(&[250.0; 60])).unwrap();
        assert_eq!(signal.snapshot.rsi, Some(100.0));
        assert_eq!(signal.snapshot.bb_upper, signal.snapshot.bb_lower);
        assert_eq!(signal.kind, SignalKind::Hold);
    }

    #[test]
    fn sell_off_then_bounce_buys() {
        // Long decline keeps RSI low; the final uptick lifts MACD over its
        // signal line while RSI is still deeply oversold.
        let mut closes: Vec<f64> = (0..50).map(|i| 200.0 - i as f64 * 2.0).collect();
        closes.extend([103.0, 104.0]);
        let signal = generate_signal(&candles_from(&closes)).unwrap();
        assert_eq!(signal.kind, SignalKind::Buy);
        assert_eq!(signal.confidence, 0.65);
    }

    #[test]
    fn rally_then_dip_sells() {
        let mut closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64 * 2.0).collect();
        closes.extend([197.0, 196.0]);
        let signal = generate_signal(&candles_from(&closes)).unwrap();
        assert_eq!(signal.kind, SignalKind::Sell);
        assert_eq!(signal.confidence, 0.65);
    }

    /// Grinding decline that breaks below the lower band on the last bar
    /// while MACD has just crossed above its signal line.
    const CAPITULATION: [f64; 60] = [
        100.0, 98.0, 95.0, 93.0, 92.0, 92.0, 88.0, 89.0, 90.0, 91.0, 91.0, 91.0, 90.0, 89.0,
        86.0, 86.0, 83.0, 84.0, 84.0, 82.0, 82.0, 79.0, 76.0, 74.0, 71.0, 70.0, 68.0, 67.0,
        64.0, 62.0, 58.0, 58.0, 57.0, 58.0, 55.0, 53.0, 54.0, 55.0, 56.0, 56.0, 53.0, 53.0,
        55.0, 51.0, 51.0, 53.0, 51.0, 50.0, 53.0, 53.0, 52.0, 53.0, 52.0, 52.0, 51.0, 51.0,
        49.0, 48.0, 48.0, 43.0,
    ];

    #[test]
    fn capitulation_is_strong_buy() {
        let signal = generate_signal(&candles_from(&CAPITULATION)).unwrap();
        assert_eq!(signal.kind, SignalKind::Buy);
        assert_eq!(signal.confidence, 0.85);
        let snap = signal.snapshot;
        assert!(snap.close.unwrap() < snap.bb_lower.unwrap());
    }

    #[test]
    fn mirrored_capitulation_is_strong_sell() {
        let closes: Vec<f64> = CAPITULATION.iter().map(|c| 200.0 - c).collect();
        let signal = generate_signal(&candles_from(&closes)).unwrap();
        assert_eq!(signal.kind, SignalKind::Sell);
        assert_eq!(signal.confidence, 0.85);
    }

    #[test]
    fn snapshot_rejects_misaligned_set() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let set = compute_indicator_set(&closes, &IndicatorParams::default()).unwrap();
        let err = IndicatorSnapshot::from_set(&set, &closes[..39]).unwrap_err();
        assert_eq!(err, IndicatorError::LengthMismatch { expected: 39, actual: 40 });
    }

    #[test]
    fn invalid_rules_rejected() {
        let mut config = SignalConfig::default();
        config.rules.strong_confidence = 1.5;
        assert!(generate_signal_with(&candles_from(&[1.0; 40]), &config).is_err());
    }

    #[test]
    fn actionable_requires_direction_and_confidence() {
        let hold = Signal {
            kind: SignalKind::Hold,
            confidence: 0.9,
            snapshot: IndicatorSnapshot::default(),
        };
        assert!(!hold.is_actionable(0.7));

        let weak = Signal {
            kind: SignalKind::Buy,
            confidence: 0.65,
            snapshot: IndicatorSnapshot::default(),
        };
        assert!(!weak.is_actionable(0.7));

        let strong = Signal {
            confidence: 0.85,
            ..weak
        };
        assert!(strong.is_actionable(0.7));
    }

    #[test]
    fn signal_serialises_undefined_as_null() {
        let signal = generate_signal(&candles_from(&[10.0; 5])).unwrap();
        let json = serde_json::to_value(signal).unwrap();
        assert_eq!(json["kind"], "hold");
        assert!(json["snapshot"]["rsi"].is_null());
        assert_eq!(json["snapshot"]["close"], 10.0);
    }
}
