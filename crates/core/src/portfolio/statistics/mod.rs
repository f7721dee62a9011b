//! Trailing-window statistics for positions and portfolios.

mod statistics_calculator;
mod statistics_model;

pub use statistics_calculator::StatisticsCalculator;
pub use statistics_model::*;
