// =============================================================================
// Signals Module
// =============================================================================
//
// Turns indicator series into a discrete trading decision:
// - Decision table over the latest RSI / MACD / Bollinger snapshot
// - Flat signal records for the storage collaborator

pub mod generator;
pub mod record;

pub use generator::{
    decide, generate_signal, generate_signal_with, IndicatorSnapshot, Signal, SignalConfig,
    SignalRules,
};
pub use record::SignalRecord;
