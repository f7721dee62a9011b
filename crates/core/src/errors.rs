//! Core error types for the analytics engine.
//!
//! Calculators are total over their documented input domain, so the only
//! errors that surface are missing exchange rates, invalid caller arguments
//! and configuration problems.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::fx::FxError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the analytics engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors raised by the calculators and chart generators.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("Unknown chart frequency: {0}")]
    UnknownFrequency(String),
}

/// Validation errors for caller input and settings parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse settings: {0}")]
    SettingsParse(#[from] serde_json::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::SettingsParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
