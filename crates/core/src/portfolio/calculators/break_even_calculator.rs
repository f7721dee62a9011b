use rust_decimal::Decimal;

use super::calculators_traits::BreakEvenCalculatorTrait;
use crate::portfolio::positions::Transaction;

/// Break-even price from running signed totals of quantity and invested cash.
///
/// Every transaction, buy or sell, moves the banked cost by `amount * price`,
/// so realized gains lower the break-even of what is still held. A position
/// that is closed out starts over from zero, and a transaction that flips a
/// long into a short (or back) opens the new side at its own price.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakEvenCalculator;

impl BreakEvenCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl BreakEvenCalculatorTrait for BreakEvenCalculator {
    fn calculate_break_even(&self, transactions: &[Transaction]) -> Decimal {
        let mut total_cost = Decimal::ZERO;
        let mut total_quantity = Decimal::ZERO;

        for transaction in transactions {
            let next_quantity = total_quantity + transaction.amount;

            let crosses_zero = !total_quantity.is_zero()
                && !next_quantity.is_zero()
                && total_quantity.is_sign_positive() != next_quantity.is_sign_positive();

            if next_quantity.is_zero() {
                total_cost = Decimal::ZERO;
            } else if crosses_zero {
                total_cost = next_quantity * transaction.price;
            } else {
                total_cost += transaction.invested();
            }
            total_quantity = next_quantity;
        }

        if total_quantity.is_zero() {
            Decimal::ZERO
        } else {
            total_cost / total_quantity
        }
    }
}
