/// Decimal precision for rates and chart values
pub const DECIMAL_PRECISION: u32 = 6;

/// Absolute tolerance on the rate step at which the IRR solver stops
pub const IRR_TOLERANCE: f64 = 1e-7;

/// Upper bound on solver iterations (Newton and bisection each)
pub const IRR_MAX_ITERATIONS: u32 = 100;

/// Lowest rate the solver will probe. A rate of -100% makes every discount factor undefined.
pub const IRR_LOWER_BOUND: f64 = -0.999_999;

/// Initial upper bracket for the bisection fallback, doubled until the NPV changes sign
pub const IRR_INITIAL_UPPER_BOUND: f64 = 1.0;

/// Trailing statistics windows, in days
pub const LAST_DAY_WINDOW_DAYS: i64 = 1;
pub const LAST_WEEK_WINDOW_DAYS: i64 = 7;
pub const LAST_MONTH_WINDOW_DAYS: i64 = 30;
