//! FX (Foreign Exchange) module - exchange-rate models and conversion.

pub mod currency_converter;
mod fx_errors;
mod fx_model;

pub use currency_converter::{combine_exchange_rates, convert_series, CurrencyConverter};
pub use fx_errors::FxError;
pub use fx_model::{Convertible, ExchangeRate};
