use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::CalculatorError;
use crate::fx::Convertible;
use crate::timeseries::{as_of, count_before, count_until, first_timestamp, Timestamped};

/// A single execution against a position.
///
/// `amount` is signed: positive buys, negative sells.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub position_id: String,
    pub timestamp: DateTime<Utc>,
    pub amount: Decimal,
    /// Unit price at execution.
    pub price: Decimal,
}

impl Transaction {
    pub fn new(
        position_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        Transaction {
            position_id: position_id.into(),
            timestamp,
            amount,
            price,
        }
    }

    /// Signed cash invested by this transaction (negative for sells).
    pub fn invested(&self) -> Decimal {
        self.amount * self.price
    }
}

impl Timestamped for Transaction {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Convertible for Transaction {
    fn convert(&self, rate: Decimal) -> Self {
        Transaction {
            price: self.price * rate,
            ..self.clone()
        }
    }
}

/// A market price sample, held constant until the next sample.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentPrice {
    pub instrument_id: String,
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

impl InstrumentPrice {
    pub fn new(instrument_id: impl Into<String>, timestamp: DateTime<Utc>, price: Decimal) -> Self {
        InstrumentPrice {
            instrument_id: instrument_id.into(),
            timestamp,
            price,
        }
    }
}

impl Timestamped for InstrumentPrice {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Convertible for InstrumentPrice {
    fn convert(&self, rate: Decimal) -> Self {
        InstrumentPrice {
            price: self.price * rate,
            ..self.clone()
        }
    }
}

/// Closed interval `[from, to]`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, CalculatorError> {
        if from > to {
            return Err(CalculatorError::InvalidDateRange { from, to });
        }
        Ok(DateRange { from, to })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.to
    }
}

/// Everything needed to value one position over `[from, to]`.
///
/// Transactions strictly before `from` establish the opening holding; those in
/// `[from, to]` are cash flows at their own execution price. The boundary
/// prices are as-of values and need not be stamped exactly at the range bounds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionPriceRangeData {
    pub position_id: String,
    pub date_range: DateRange,
    pub transactions: Vec<Transaction>,
    pub price_at_range_start: Option<InstrumentPrice>,
    pub price_at_range_end: Option<InstrumentPrice>,
}

impl PositionPriceRangeData {
    /// Quantity held at `at`, clamped to the end of the range.
    pub fn quantity_at(&self, at: DateTime<Utc>) -> Decimal {
        let at = at.min(self.date_range.to);
        let held = count_until(&self.transactions, at);
        self.transactions[..held].iter().map(|t| t.amount).sum()
    }

    pub fn start_price(&self) -> Decimal {
        self.price_at_range_start
            .as_ref()
            .map_or(Decimal::ZERO, |p| p.price)
    }

    pub fn end_price(&self) -> Decimal {
        self.price_at_range_end
            .as_ref()
            .map_or(Decimal::ZERO, |p| p.price)
    }

    /// Quantity held just before `from`, i.e. before anything trades at `from`.
    pub fn quantity_before(&self, from: DateTime<Utc>) -> Decimal {
        self.held_before(from).iter().map(|t| t.amount).sum()
    }

    /// Market value of the opening holding at `price_at_range_start`.
    ///
    /// Without a start price the holding is valued at what was paid for it.
    pub fn opening_value(&self, from: DateTime<Utc>) -> Decimal {
        holding_value(self.held_before(from), self.price_at_range_start.as_ref())
    }

    /// Market value of the holding at `to` at `price_at_range_end`.
    ///
    /// Without an end price the holding is valued at what was paid for it.
    pub fn closing_value(&self, to: DateTime<Utc>) -> Decimal {
        let to = to.min(self.date_range.to);
        let held = count_until(&self.transactions, to);
        holding_value(&self.transactions[..held], self.price_at_range_end.as_ref())
    }

    /// Transactions at or after `from` and at or before `to`.
    pub fn transactions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> &[Transaction] {
        let to = to.min(self.date_range.to);
        let start = count_before(&self.transactions, from);
        let end = count_until(&self.transactions, to).max(start);
        &self.transactions[start..end]
    }

    fn held_before(&self, from: DateTime<Utc>) -> &[Transaction] {
        let from = from.min(self.date_range.to);
        &self.transactions[..count_before(&self.transactions, from)]
    }
}

fn holding_value(held: &[Transaction], price: Option<&InstrumentPrice>) -> Decimal {
    let quantity: Decimal = held.iter().map(|t| t.amount).sum();
    if quantity.is_zero() {
        return Decimal::ZERO;
    }
    match price {
        Some(price) => quantity * price.price,
        None => held.iter().map(Transaction::invested).sum(),
    }
}

/// Full price and transaction history of one position over a window.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionPriceListData {
    pub position_id: String,
    pub prices: Vec<InstrumentPrice>,
    pub transactions: Vec<Transaction>,
}

impl PositionPriceListData {
    /// Earliest instant at which either a price or a transaction exists.
    pub fn first_data_time(&self) -> Option<DateTime<Utc>> {
        match (first_timestamp(&self.prices), first_timestamp(&self.transactions)) {
            (Some(p), Some(t)) => Some(p.min(t)),
            (p, t) => p.or(t),
        }
    }

    /// Materializes the range view for `[from, to]`: every transaction up to
    /// `to` and the as-of prices at both bounds.
    pub fn range_data(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> PositionPriceRangeData {
        let held = count_until(&self.transactions, to);
        PositionPriceRangeData {
            position_id: self.position_id.clone(),
            date_range: DateRange { from, to },
            transactions: self.transactions[..held].to_vec(),
            price_at_range_start: as_of(&self.prices, from).cloned(),
            price_at_range_end: as_of(&self.prices, to).cloned(),
        }
    }
}

/// Range views of every position in a portfolio.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPositionsPriceRangeData {
    pub portfolio_id: String,
    pub positions: Vec<PositionPriceRangeData>,
}

/// Price and transaction histories of every position in a portfolio.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPositionsPriceListData {
    pub portfolio_id: String,
    pub positions: Vec<PositionPriceListData>,
}

impl PortfolioPositionsPriceListData {
    pub fn first_data_time(&self) -> Option<DateTime<Utc>> {
        self.positions
            .iter()
            .filter_map(PositionPriceListData::first_data_time)
            .min()
    }

    pub fn range_data(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> PortfolioPositionsPriceRangeData {
        PortfolioPositionsPriceRangeData {
            portfolio_id: self.portfolio_id.clone(),
            positions: self
                .positions
                .iter()
                .map(|p| p.range_data(from, to))
                .collect(),
        }
    }
}

/// Price history of a single instrument, independent of any holding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentPriceListData {
    pub instrument_id: String,
    pub prices: Vec<InstrumentPrice>,
}
