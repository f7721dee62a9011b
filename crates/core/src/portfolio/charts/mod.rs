//! Time-sampled value, profit and performance charts.

mod chart_generator;
mod charts_model;

pub use chart_generator::ChartGenerator;
pub use charts_model::*;
