use thiserror::Error;

/// Errors raised while aligning or applying exchange rates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FxError {
    /// No rate exists at or before the instant being converted.
    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),

    #[error("Invalid currency pair: {0}")]
    InvalidCurrencyPair(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
}
