use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;

use super::calculators_traits::ProfitCalculatorTrait;
use crate::portfolio::positions::PositionPriceRangeData;

/// Gain of one position over `[from, to]`:
/// value at `to` - value held coming into `from` - cash invested in between.
///
/// A transaction stamped exactly at `from` counts as new investment at its own
/// price, so buying below market shows up as profit from the first instant.
pub fn position_profit(
    position: &PositionPriceRangeData,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Decimal {
    let closing_value = position.closing_value(to);
    let opening_value = position.opening_value(from);
    let invested: Decimal = position
        .transactions_between(from, to)
        .iter()
        .map(|t| t.invested())
        .sum();

    closing_value - opening_value - invested
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitCalculator;

impl ProfitCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ProfitCalculatorTrait for ProfitCalculator {
    fn calculate_profit(
        &self,
        positions: &[PositionPriceRangeData],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Decimal {
        positions
            .par_iter()
            .map(|position| position_profit(position, from, to))
            .collect::<Vec<_>>()
            .into_iter()
            .sum()
    }
}
