use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CalculatorError;

/// Sampling step of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFrequency {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl ChartFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartFrequency::Hour => "hour",
            ChartFrequency::Day => "day",
            ChartFrequency::Week => "week",
            ChartFrequency::Month => "month",
            ChartFrequency::Year => "year",
        }
    }

    /// The instant `steps` periods after `start`.
    ///
    /// Calendar frequencies are always computed from `start` so that month-end
    /// clamping (Jan 31 -> Feb 28) does not drift into later steps.
    /// Returns `None` once the result leaves chrono's representable range.
    pub fn advance(&self, start: DateTime<Utc>, steps: u32) -> Option<DateTime<Utc>> {
        match self {
            ChartFrequency::Hour => start.checked_add_signed(Duration::hours(i64::from(steps))),
            ChartFrequency::Day => start.checked_add_signed(Duration::days(i64::from(steps))),
            ChartFrequency::Week => start.checked_add_signed(Duration::weeks(i64::from(steps))),
            ChartFrequency::Month => start.checked_add_months(Months::new(steps)),
            ChartFrequency::Year => start.checked_add_months(Months::new(steps.checked_mul(12)?)),
        }
    }
}

impl fmt::Display for ChartFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartFrequency {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(ChartFrequency::Hour),
            "day" => Ok(ChartFrequency::Day),
            "week" => Ok(ChartFrequency::Week),
            "month" => Ok(ChartFrequency::Month),
            "year" => Ok(ChartFrequency::Year),
            other => Err(CalculatorError::UnknownFrequency(other.to_string())),
        }
    }
}

/// Every step of `frequency` from `start` up to and including `end`.
pub fn get_sample_times(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    frequency: ChartFrequency,
) -> Vec<DateTime<Utc>> {
    if start > end {
        return Vec::new();
    }
    let mut times = Vec::new();
    let mut step: u32 = 0;
    while let Some(current) = frequency.advance(start, step) {
        if current > end {
            break;
        }
        times.push(current);
        step = match step.checked_add(1) {
            Some(next) => next,
            None => break,
        };
    }
    times
}
