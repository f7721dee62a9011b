use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fx::Convertible;
use crate::portfolio::positions::DateRange;
use crate::timeseries::Timestamped;
use crate::utils::ChartFrequency;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Decimal,
}

impl ChartPoint {
    pub fn new(timestamp: DateTime<Utc>, value: Decimal) -> Self {
        ChartPoint { timestamp, value }
    }
}

impl Timestamped for ChartPoint {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Convertible for ChartPoint {
    fn convert(&self, rate: Decimal) -> Self {
        ChartPoint {
            timestamp: self.timestamp,
            value: self.value * rate,
        }
    }
}

/// What each chart point measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartMetric {
    Value,
    Profit,
    Performance,
}

/// Levels at every step, or the change between consecutive steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ChartMode {
    #[default]
    Cumulative,
    Aggregated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub date_range: DateRange,
    pub frequency: ChartFrequency,
    pub metric: ChartMetric,
    #[serde(default)]
    pub mode: ChartMode,
}

impl ChartRequest {
    pub fn cumulative(metric: ChartMetric, date_range: DateRange, frequency: ChartFrequency) -> Self {
        ChartRequest {
            date_range,
            frequency,
            metric,
            mode: ChartMode::Cumulative,
        }
    }

    pub fn aggregated(metric: ChartMetric, date_range: DateRange, frequency: ChartFrequency) -> Self {
        ChartRequest {
            date_range,
            frequency,
            metric,
            mode: ChartMode::Aggregated,
        }
    }
}
