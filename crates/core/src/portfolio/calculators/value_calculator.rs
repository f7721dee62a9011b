use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;

use super::calculators_traits::ValueCalculatorTrait;
use crate::portfolio::positions::PositionPriceRangeData;

/// Market value of one position: quantity held at `at` times the range-end price.
pub fn position_value(position: &PositionPriceRangeData, at: DateTime<Utc>) -> Decimal {
    let quantity = position.quantity_at(at);
    if quantity.is_zero() {
        return Decimal::ZERO;
    }
    quantity * position.end_price()
}

/// Sums held quantity times latest price across positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCalculator;

impl ValueCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ValueCalculatorTrait for ValueCalculator {
    fn calculate_value(&self, positions: &[PositionPriceRangeData], at: DateTime<Utc>) -> Decimal {
        positions
            .par_iter()
            .map(|position| position_value(position, at))
            .collect::<Vec<_>>()
            .into_iter()
            .sum()
    }
}
