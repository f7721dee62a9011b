use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::{Convertible, ExchangeRate};
use crate::timeseries::{as_of, Timestamped};
use log::warn;
use std::collections::HashMap;

/// Rescales every item by the rate in effect at the item's own timestamp.
///
/// `rates` must be sorted ascending by timestamp. Fails with
/// [`FxError::RateNotFound`] as soon as one item precedes the first rate; no
/// partial output is returned in that case.
pub fn convert_series<T: Convertible>(
    items: &[T],
    rates: &[ExchangeRate],
) -> Result<Vec<T>, FxError> {
    items
        .iter()
        .map(|item| {
            let at = item.timestamp();
            match as_of(rates, at) {
                Some(rate) => Ok(item.convert(rate.rate)),
                None => {
                    warn!("No exchange rate at or before {} to convert with", at);
                    Err(FxError::RateNotFound(format!(
                        "{} at or before {}",
                        rates
                            .first()
                            .map(ExchangeRate::pair_label)
                            .unwrap_or_else(|| "empty series".to_string()),
                        at
                    )))
                }
            }
        })
        .collect()
}

/// Chains `X -> Y` rates with `Y -> Z` rates into `X -> Z` rates.
///
/// The result has exactly the timestamps of `second`; at each of them the
/// `first` leg is looked up as-of that instant.
pub fn combine_exchange_rates(
    first: &[ExchangeRate],
    second: &[ExchangeRate],
) -> Result<Vec<ExchangeRate>, FxError> {
    second
        .iter()
        .map(|outer| {
            let inner = as_of(first, outer.timestamp).ok_or_else(|| {
                FxError::RateNotFound(format!(
                    "{} at or before {}",
                    first
                        .first()
                        .map(ExchangeRate::pair_label)
                        .unwrap_or_else(|| format!("?->{}", outer.from_currency)),
                    outer.timestamp
                ))
            })?;
            Ok(ExchangeRate {
                from_currency: inner.from_currency.clone(),
                to_currency: outer.to_currency.clone(),
                rate: inner.rate * outer.rate,
                timestamp: outer.timestamp,
            })
        })
        .collect()
}

/// Registry of rate series keyed by currency pair.
///
/// Resolves a conversion as a direct series, the reciprocal of the reverse
/// series, or a two-hop series through a pivot currency.
#[derive(Debug, Clone, Default)]
pub struct CurrencyConverter {
    /// Key: (From_Currency, To_Currency). Each series is sorted by timestamp.
    rates: HashMap<(String, String), Vec<ExchangeRate>>,
}

impl CurrencyConverter {
    /// Creates a new `CurrencyConverter` from a Vec of ExchangeRate.
    pub fn new(exchange_rates: Vec<ExchangeRate>) -> Self {
        let mut converter = CurrencyConverter::default();
        converter.add_historical_rates(exchange_rates);
        converter
    }

    /// Adds historical FX rates. Same-currency rates are ignored.
    pub fn add_historical_rates(&mut self, rates: Vec<ExchangeRate>) {
        for rate in rates {
            if rate.from_currency == rate.to_currency {
                continue;
            }
            let pair = (rate.from_currency.clone(), rate.to_currency.clone());
            self.rates.entry(pair).or_default().push(rate);
        }
        for series in self.rates.values_mut() {
            series.sort_by_key(|r| r.timestamp);
        }
    }

    fn direct(&self, from: &str, to: &str) -> Option<&Vec<ExchangeRate>> {
        self.rates.get(&(from.to_string(), to.to_string()))
    }

    /// Resolves the `from -> to` series without going through a pivot.
    fn single_hop(&self, from: &str, to: &str) -> Result<Option<Vec<ExchangeRate>>, FxError> {
        if let Some(series) = self.direct(from, to) {
            return Ok(Some(series.clone()));
        }
        match self.direct(to, from) {
            Some(reverse) => reverse
                .iter()
                .map(ExchangeRate::inverse)
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            None => Ok(None),
        }
    }

    /// The `from -> to` rate series, going through `pivot` when no direct or
    /// reverse series is registered.
    pub fn rates_between(
        &self,
        from: &str,
        to: &str,
        pivot: &str,
    ) -> Result<Vec<ExchangeRate>, FxError> {
        if from == to {
            return Err(FxError::InvalidCurrencyPair(format!(
                "{}->{} needs no conversion",
                from, to
            )));
        }

        if let Some(series) = self.single_hop(from, to)? {
            return Ok(series);
        }

        if pivot != from && pivot != to {
            if let (Some(first_leg), Some(second_leg)) =
                (self.single_hop(from, pivot)?, self.single_hop(pivot, to)?)
            {
                return combine_exchange_rates(&first_leg, &second_leg);
            }
        }

        Err(FxError::InvalidCurrencyPair(format!(
            "No rate series for {} -> {} (pivot {})",
            from, to, pivot
        )))
    }

    /// Converts a series of items from one currency to another.
    /// Items are returned unchanged when both currencies are the same.
    pub fn convert<T: Convertible + Clone>(
        &self,
        items: &[T],
        from: &str,
        to: &str,
        pivot: &str,
    ) -> Result<Vec<T>, FxError> {
        if from == to {
            return Ok(items.to_vec());
        }
        let rates = self.rates_between(from, to, pivot)?;
        convert_series(items, &rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone, PartialEq)]
    struct Amount {
        at: DateTime<Utc>,
        value: Decimal,
    }

    impl Timestamped for Amount {
        fn timestamp(&self) -> DateTime<Utc> {
            self.at
        }
    }

    impl Convertible for Amount {
        fn convert(&self, rate: Decimal) -> Self {
            Amount {
                at: self.at,
                value: self.value * rate,
            }
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, d, 12, 0, 0).unwrap()
    }

    fn make_rate(from: &str, to: &str, rate: Decimal, d: u32) -> ExchangeRate {
        ExchangeRate::new(from, to, rate, day(d))
    }

    #[test]
    fn test_convert_uses_rate_in_effect_at_item_time() {
        let rates = vec![
            make_rate("USD", "EUR", dec!(0.90), 1),
            make_rate("USD", "EUR", dec!(0.95), 10),
        ];
        let items = vec![
            Amount { at: day(5), value: dec!(100) },
            Amount { at: day(10), value: dec!(100) },
            Amount { at: day(20), value: dec!(10) },
        ];

        let converted = convert_series(&items, &rates).unwrap();

        assert_eq!(converted[0].value, dec!(90.00));
        assert_eq!(converted[1].value, dec!(95.00));
        assert_eq!(converted[2].value, dec!(9.50));
        assert_eq!(converted[0].at, day(5));
    }

    #[test]
    fn test_convert_fails_when_item_precedes_rates() {
        let rates = vec![make_rate("USD", "EUR", dec!(0.90), 10)];
        let items = vec![
            Amount { at: day(12), value: dec!(1) },
            Amount { at: day(3), value: dec!(1) },
        ];

        let err = convert_series(&items, &rates).unwrap_err();
        assert!(matches!(err, FxError::RateNotFound(_)));
    }

    #[test]
    fn test_convert_with_empty_rates_fails() {
        let items = vec![Amount { at: day(3), value: dec!(1) }];
        assert!(convert_series(&items, &[]).is_err());
    }

    #[test]
    fn test_combine_drives_off_second_series() {
        let eur_usd = vec![
            make_rate("EUR", "USD", dec!(1.10), 1),
            make_rate("EUR", "USD", dec!(1.20), 15),
        ];
        let usd_pln = vec![
            make_rate("USD", "PLN", dec!(4.0), 2),
            make_rate("USD", "PLN", dec!(4.5), 14),
            make_rate("USD", "PLN", dec!(5.0), 20),
        ];

        let combined = combine_exchange_rates(&eur_usd, &usd_pln).unwrap();

        let times: Vec<_> = combined.iter().map(|r| r.timestamp).collect();
        assert_eq!(times, vec![day(2), day(14), day(20)]);
        assert_eq!(combined[0].rate, dec!(4.400));
        assert_eq!(combined[1].rate, dec!(4.950));
        assert_eq!(combined[2].rate, dec!(6.000));
        assert_eq!(combined[0].from_currency, "EUR");
        assert_eq!(combined[0].to_currency, "PLN");
    }

    #[test]
    fn test_combine_fails_when_first_leg_starts_later() {
        let eur_usd = vec![make_rate("EUR", "USD", dec!(1.10), 5)];
        let usd_pln = vec![make_rate("USD", "PLN", dec!(4.0), 2)];
        assert!(matches!(
            combine_exchange_rates(&eur_usd, &usd_pln),
            Err(FxError::RateNotFound(_))
        ));
    }

    #[test]
    fn test_registry_resolves_reverse_series() {
        let converter = CurrencyConverter::new(vec![make_rate("EUR", "USD", dec!(1.25), 1)]);
        let series = converter.rates_between("USD", "EUR", "USD").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].rate, dec!(0.8));
        assert_eq!(series[0].from_currency, "USD");
    }

    #[test]
    fn test_registry_resolves_through_pivot() {
        let converter = CurrencyConverter::new(vec![
            make_rate("GBP", "USD", dec!(1.30), 1),
            make_rate("PLN", "USD", dec!(0.25), 1),
            make_rate("PLN", "USD", dec!(0.20), 8),
        ]);

        let series = converter.rates_between("GBP", "PLN", "USD").unwrap();

        // Second leg is USD->PLN, the reciprocal of PLN->USD, sampled on days 1 and 8.
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].rate, dec!(5.20));
        assert_eq!(series[1].rate, dec!(6.50));
    }

    #[test]
    fn test_registry_without_path_fails() {
        let converter = CurrencyConverter::new(vec![make_rate("GBP", "USD", dec!(1.30), 1)]);
        assert!(matches!(
            converter.rates_between("GBP", "JPY", "USD"),
            Err(FxError::InvalidCurrencyPair(_))
        ));
    }

    #[test]
    fn test_registry_rejects_zero_rate_inversion() {
        let converter = CurrencyConverter::new(vec![make_rate("EUR", "USD", Decimal::ZERO, 1)]);
        assert!(matches!(
            converter.rates_between("USD", "EUR", "CHF"),
            Err(FxError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_same_currency_conversion_is_identity() {
        let converter = CurrencyConverter::default();
        let items = vec![Amount { at: day(1), value: dec!(42) }];
        let converted = converter.convert(&items, "USD", "USD", "USD").unwrap();
        assert_eq!(converted, items);
    }

    #[test]
    fn test_registry_sorts_unordered_input() {
        let converter = CurrencyConverter::new(vec![
            make_rate("EUR", "USD", dec!(1.2), 9),
            make_rate("EUR", "USD", dec!(1.1), 1),
        ]);
        let items = vec![Amount { at: day(5), value: dec!(10) }];
        let converted = converter.convert(&items, "EUR", "USD", "USD").unwrap();
        assert_eq!(converted[0].value, dec!(11.0));
    }
}
