use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use rayon::prelude::*;
use rust_decimal::Decimal;

use super::charts_model::{ChartMetric, ChartMode, ChartPoint, ChartRequest};
use crate::errors::Result;
use crate::fx::{convert_series, ExchangeRate};
use crate::portfolio::calculators::{
    PerformanceCalculator, PerformanceCalculatorTrait, ProfitCalculator, ProfitCalculatorTrait,
    ValueCalculator, ValueCalculatorTrait,
};
use crate::portfolio::positions::AnalyticsSourceTrait;
use crate::settings::CalculatorSettings;
use crate::utils::get_sample_times;

/// Generates evenly spaced charts for instruments, positions and portfolios.
///
/// The same engine serves every level: the source decides how range data is
/// materialized, the request picks the metric and whether levels or deltas
/// are emitted.
#[derive(Clone)]
pub struct ChartGenerator {
    value_calculator: Arc<dyn ValueCalculatorTrait>,
    profit_calculator: Arc<dyn ProfitCalculatorTrait>,
    performance_calculator: Arc<dyn PerformanceCalculatorTrait>,
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::with_settings(&CalculatorSettings::default())
    }
}

impl ChartGenerator {
    pub fn new(
        value_calculator: Arc<dyn ValueCalculatorTrait>,
        profit_calculator: Arc<dyn ProfitCalculatorTrait>,
        performance_calculator: Arc<dyn PerformanceCalculatorTrait>,
    ) -> Self {
        Self {
            value_calculator,
            profit_calculator,
            performance_calculator,
        }
    }

    pub fn with_settings(settings: &CalculatorSettings) -> Self {
        Self::new(
            Arc::new(ValueCalculator),
            Arc::new(ProfitCalculator),
            Arc::new(PerformanceCalculator::new(settings.clone())),
        )
    }

    /// Builds the chart described by `request`.
    ///
    /// The first point is clipped forward to the first observation of the
    /// source; a source without data yields an empty chart.
    pub fn generate<S>(&self, source: &S, request: &ChartRequest) -> Vec<ChartPoint>
    where
        S: AnalyticsSourceTrait + ?Sized,
    {
        let first_data_time = match source.first_data_time() {
            Some(t) => t,
            None => {
                debug!("No data for {}; empty chart", source.source_id());
                return Vec::new();
            }
        };
        let chart_start = request.date_range.from.max(first_data_time);
        let sample_times = get_sample_times(chart_start, request.date_range.to, request.frequency);

        let cumulative: Vec<ChartPoint> = sample_times
            .par_iter()
            .map(|&at| {
                ChartPoint::new(at, self.metric_at(source, request.metric, chart_start, at))
            })
            .collect();

        debug!(
            "Generated {} {:?} points for {} from {} every {}",
            cumulative.len(),
            request.metric,
            source.source_id(),
            chart_start,
            request.frequency
        );

        match request.mode {
            ChartMode::Cumulative => cumulative,
            ChartMode::Aggregated => aggregate(&cumulative),
        }
    }

    /// Builds the chart and converts each point with the rate in effect at
    /// the point's own timestamp. Fails as a whole if any point lacks a rate.
    ///
    /// Performance points are rates of return, not amounts, and are returned
    /// unconverted.
    pub fn generate_in_currency<S>(
        &self,
        source: &S,
        request: &ChartRequest,
        rates: &[ExchangeRate],
    ) -> Result<Vec<ChartPoint>>
    where
        S: AnalyticsSourceTrait + ?Sized,
    {
        let points = self.generate(source, request);
        match request.metric {
            ChartMetric::Performance => Ok(points),
            ChartMetric::Value | ChartMetric::Profit => Ok(convert_series(&points, rates)?),
        }
    }

    fn metric_at<S>(
        &self,
        source: &S,
        metric: ChartMetric,
        chart_start: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> Decimal
    where
        S: AnalyticsSourceTrait + ?Sized,
    {
        let data = source.range_data(chart_start, at);
        match metric {
            ChartMetric::Value => self.value_calculator.calculate_value(&data, at),
            ChartMetric::Profit => self
                .profit_calculator
                .calculate_profit(&data, chart_start, at),
            ChartMetric::Performance => {
                self.performance_calculator
                    .calculate_performance(&data, chart_start, at)
            }
        }
    }
}

/// One point per consecutive pair: the change from the previous step,
/// stamped with the later step.
fn aggregate(cumulative: &[ChartPoint]) -> Vec<ChartPoint> {
    cumulative
        .windows(2)
        .map(|pair| ChartPoint::new(pair[1].timestamp, pair[1].value - pair[0].value))
        .collect()
}
