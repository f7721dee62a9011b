//! Data-access capability shared by chart generation and statistics.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::positions_model::{
    DateRange, InstrumentPriceListData, PortfolioPositionsPriceListData, PositionPriceListData,
    PositionPriceRangeData, Transaction,
};
use crate::timeseries::{as_of, first_timestamp};

/// Anything that can be valued over an arbitrary window: an instrument, a
/// position or a whole portfolio.
pub trait AnalyticsSourceTrait: Send + Sync {
    /// Identifier echoed back in statistics.
    fn source_id(&self) -> &str;

    /// Earliest instant at which any input data exists.
    fn first_data_time(&self) -> Option<DateTime<Utc>>;

    /// Whether any transaction has been recorded.
    fn has_transactions(&self) -> bool;

    /// Range views for `[from, to]`, one per constituent position.
    fn range_data(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<PositionPriceRangeData>;
}

impl AnalyticsSourceTrait for PositionPriceListData {
    fn source_id(&self) -> &str {
        &self.position_id
    }

    fn first_data_time(&self) -> Option<DateTime<Utc>> {
        PositionPriceListData::first_data_time(self)
    }

    fn has_transactions(&self) -> bool {
        !self.transactions.is_empty()
    }

    fn range_data(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<PositionPriceRangeData> {
        vec![PositionPriceListData::range_data(self, from, to)]
    }
}

impl AnalyticsSourceTrait for PortfolioPositionsPriceListData {
    fn source_id(&self) -> &str {
        &self.portfolio_id
    }

    fn first_data_time(&self) -> Option<DateTime<Utc>> {
        PortfolioPositionsPriceListData::first_data_time(self)
    }

    fn has_transactions(&self) -> bool {
        self.positions.iter().any(|p| !p.transactions.is_empty())
    }

    fn range_data(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<PositionPriceRangeData> {
        PortfolioPositionsPriceListData::range_data(self, from, to).positions
    }
}

/// An instrument is analysed as one unit bought at the as-of price of `from`.
impl AnalyticsSourceTrait for InstrumentPriceListData {
    fn source_id(&self) -> &str {
        &self.instrument_id
    }

    fn first_data_time(&self) -> Option<DateTime<Utc>> {
        first_timestamp(&self.prices)
    }

    fn has_transactions(&self) -> bool {
        !self.prices.is_empty()
    }

    fn range_data(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<PositionPriceRangeData> {
        let start = as_of(&self.prices, from).cloned();
        let transactions = start
            .as_ref()
            .map(|price| {
                vec![Transaction::new(
                    self.instrument_id.clone(),
                    from,
                    Decimal::ONE,
                    price.price,
                )]
            })
            .unwrap_or_default();

        vec![PositionPriceRangeData {
            position_id: self.instrument_id.clone(),
            date_range: DateRange { from, to },
            transactions,
            price_at_range_start: start,
            price_at_range_end: as_of(&self.prices, to).cloned(),
        }]
    }
}
