pub mod time_utils;

pub use time_utils::{get_sample_times, ChartFrequency};
