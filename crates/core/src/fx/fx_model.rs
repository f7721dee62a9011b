use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FxError;
use crate::timeseries::Timestamped;

/// One observation of the `from_currency -> to_currency` rate.
///
/// Like instrument prices, a rate stays in effect until the next observation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn new(
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        rate: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        ExchangeRate {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            rate,
            timestamp,
        }
    }

    /// The reciprocal observation (`to -> from`) at the same instant.
    pub fn inverse(&self) -> Result<ExchangeRate, FxError> {
        if self.rate.is_zero() {
            return Err(FxError::InvalidRate(format!(
                "{}->{} is zero at {} and cannot be inverted",
                self.from_currency, self.to_currency, self.timestamp
            )));
        }
        Ok(ExchangeRate {
            from_currency: self.to_currency.clone(),
            to_currency: self.from_currency.clone(),
            rate: Decimal::ONE / self.rate,
            timestamp: self.timestamp,
        })
    }

    pub fn pair_label(&self) -> String {
        format!("{}->{}", self.from_currency, self.to_currency)
    }
}

impl Timestamped for ExchangeRate {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A time-stamped value carrying monetary fields that scale with a rate.
pub trait Convertible: Timestamped + Sized {
    /// Returns a copy with every monetary field multiplied by `rate`.
    fn convert(&self, rate: Decimal) -> Self;
}
