// =============================================================================
// Signal Record — storage hand-off for every evaluated signal
// =============================================================================
//
// The engine never persists anything.  A `SignalRecord` is the flat row the
// storage collaborator receives: one per evaluation, holds included, with the
// indicator values that drove the decision.  Undefined indicators stay `null`.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::SignalKind;

use super::generator::Signal;

/// Flat, serialisable record of one signal evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Unique identifier for this record (UUID v4).
    pub id: String,

    pub symbol: String,

    pub signal_type: SignalKind,

    /// Close price of the last candle at evaluation time.
    pub price: f64,

    pub rsi: Option<f64>,

    pub macd: Option<f64>,

    pub signal_line: Option<f64>,

    pub confidence: f64,

    /// ISO 8601 timestamp of when this record was created.
    pub created_at: String,
}

impl SignalRecord {
    pub fn new(symbol: impl Into<String>, price: f64, signal: &Signal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            signal_type: signal.kind,
            price,
            rsi: signal.snapshot.rsi,
            macd: signal.snapshot.macd,
            signal_line: signal.snapshot.signal_line,
            confidence: signal.confidence,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
