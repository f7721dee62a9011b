//! One trait per calculator kind so implementations can be swapped in tests
//! and composed by the chart and statistics generators.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::portfolio::positions::{PositionPriceRangeData, Transaction};

pub trait BreakEvenCalculatorTrait: Send + Sync {
    /// Per-unit price at which the current holding recovers its net cost.
    fn calculate_break_even(&self, transactions: &[Transaction]) -> Decimal;
}

pub trait ValueCalculatorTrait: Send + Sync {
    /// Market value of every position at `at`.
    fn calculate_value(&self, positions: &[PositionPriceRangeData], at: DateTime<Utc>) -> Decimal;
}

pub trait ProfitCalculatorTrait: Send + Sync {
    /// Monetary gain over `[from, to]`, net of capital added or withdrawn.
    fn calculate_profit(
        &self,
        positions: &[PositionPriceRangeData],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Decimal;
}

pub trait PerformanceCalculatorTrait: Send + Sync {
    /// Holding-period rate of return over `[from, to]` as a fraction.
    fn calculate_performance(
        &self,
        positions: &[PositionPriceRangeData],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Decimal;
}
