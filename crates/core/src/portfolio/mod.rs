//! Portfolio analytics: input data, calculators, charts and statistics.

pub mod calculators;
pub mod charts;
pub mod positions;
pub mod statistics;

pub use calculators::*;
pub use charts::*;
pub use positions::*;
pub use statistics::*;
