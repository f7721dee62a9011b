//! Pure calculators over position range data.

mod break_even_calculator;
mod calculators_traits;
mod performance_calculator;
mod profit_calculator;
mod value_calculator;

pub use break_even_calculator::BreakEvenCalculator;
pub use calculators_traits::{
    BreakEvenCalculatorTrait, PerformanceCalculatorTrait, ProfitCalculatorTrait,
    ValueCalculatorTrait,
};
pub use performance_calculator::{
    holding_period_rate, position_cash_flows, CashFlow, PerformanceCalculator,
};
pub use profit_calculator::{position_profit, ProfitCalculator};
pub use value_calculator::{position_value, ValueCalculator};
