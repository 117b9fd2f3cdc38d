// =============================================================================
// Engine errors
// =============================================================================
//
// Insufficient history is never an error: indicator series carry `None` for
// every position whose window has not filled yet.  The variants below cover
// calls that would otherwise produce garbage output and are rejected up front.

use thiserror::Error;

/// Errors raised by the indicator engine and the signal generator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// A tunable parameter is outside its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The price or candle sequence is empty.
    #[error("input sequence is empty")]
    EmptyInput,

    /// A price is NaN or infinite.
    #[error("non-finite price at index {index}")]
    NonFinitePrice { index: usize },

    /// Two sequences that must be index-aligned have different lengths.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A candle violates the OHLCV invariants or the chronological order.
    #[error("invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },
}

impl IndicatorError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the engine.
pub type IndicatorResult<T> = Result<T, IndicatorError>;
