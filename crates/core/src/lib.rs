//! Folio Analytics Core - value, profit and rate-of-return analytics.
//!
//! This crate turns already-materialized transaction, price and exchange-rate
//! series into scalar metrics, time-sampled charts and trailing statistics.
//! Every calculator is a pure function of its inputs; fetching and persisting
//! the data is left to the caller.

pub mod constants;
pub mod errors;
pub mod fx;
pub mod portfolio;
pub mod settings;
pub mod timeseries;
pub mod utils;

// Re-export common types from the portfolio module
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
