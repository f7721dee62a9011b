use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use rust_decimal::Decimal;

use super::statistics_model::{PortfolioStatistics, PositionStatistics, WindowedReturns};
use crate::constants::{LAST_DAY_WINDOW_DAYS, LAST_MONTH_WINDOW_DAYS, LAST_WEEK_WINDOW_DAYS};
use crate::portfolio::calculators::{
    BreakEvenCalculator, BreakEvenCalculatorTrait, PerformanceCalculator,
    PerformanceCalculatorTrait, ProfitCalculator, ProfitCalculatorTrait,
};
use crate::portfolio::positions::{
    AnalyticsSourceTrait, PortfolioPositionsPriceListData, PositionPriceListData,
};
use crate::settings::CalculatorSettings;
use crate::timeseries::count_until;

/// Profit and performance for the all-time, month, week and day windows
/// ending at a given instant.
#[derive(Clone)]
pub struct StatisticsCalculator {
    profit_calculator: Arc<dyn ProfitCalculatorTrait>,
    performance_calculator: Arc<dyn PerformanceCalculatorTrait>,
    break_even_calculator: Arc<dyn BreakEvenCalculatorTrait>,
}

impl Default for StatisticsCalculator {
    fn default() -> Self {
        Self::with_settings(&CalculatorSettings::default())
    }
}

impl StatisticsCalculator {
    pub fn new(
        profit_calculator: Arc<dyn ProfitCalculatorTrait>,
        performance_calculator: Arc<dyn PerformanceCalculatorTrait>,
        break_even_calculator: Arc<dyn BreakEvenCalculatorTrait>,
    ) -> Self {
        Self {
            profit_calculator,
            performance_calculator,
            break_even_calculator,
        }
    }

    pub fn with_settings(settings: &CalculatorSettings) -> Self {
        Self::new(
            Arc::new(ProfitCalculator),
            Arc::new(PerformanceCalculator::new(settings.clone())),
            Arc::new(BreakEvenCalculator),
        )
    }

    pub fn calculate_position_statistics(
        &self,
        data: &PositionPriceListData,
        now: DateTime<Utc>,
    ) -> PositionStatistics {
        let held = count_until(&data.transactions, now);
        PositionStatistics {
            position_id: data.position_id.clone(),
            returns: self.calculate_windowed_returns(data, now),
            break_even_point: self
                .break_even_calculator
                .calculate_break_even(&data.transactions[..held]),
        }
    }

    pub fn calculate_portfolio_statistics(
        &self,
        data: &PortfolioPositionsPriceListData,
        now: DateTime<Utc>,
    ) -> PortfolioStatistics {
        PortfolioStatistics {
            portfolio_id: data.portfolio_id.clone(),
            returns: self.calculate_windowed_returns(data, now),
        }
    }

    /// All-zero when the source has no transactions or no data before `now`.
    /// Windows reaching back before the first observation start at it.
    pub fn calculate_windowed_returns<S>(&self, source: &S, now: DateTime<Utc>) -> WindowedReturns
    where
        S: AnalyticsSourceTrait + ?Sized,
    {
        if !source.has_transactions() {
            return WindowedReturns::default();
        }
        let first_data_time = match source.first_data_time() {
            Some(first) if first <= now => first,
            _ => return WindowedReturns::default(),
        };

        let window = |from: DateTime<Utc>| -> (Decimal, Decimal) {
            let from = from.max(first_data_time);
            let data = source.range_data(from, now);
            (
                self.profit_calculator.calculate_profit(&data, from, now),
                self.performance_calculator
                    .calculate_performance(&data, from, now),
            )
        };

        let (total_profit, total_performance) = window(first_data_time);
        let (last_month_profit, last_month_performance) =
            window(now - Duration::days(LAST_MONTH_WINDOW_DAYS));
        let (last_week_profit, last_week_performance) =
            window(now - Duration::days(LAST_WEEK_WINDOW_DAYS));
        let (last_day_profit, last_day_performance) =
            window(now - Duration::days(LAST_DAY_WINDOW_DAYS));

        debug!(
            "Statistics for {} as of {}: total profit {}, total performance {}",
            source.source_id(),
            now,
            total_profit,
            total_performance
        );

        WindowedReturns {
            total_profit,
            last_month_profit,
            last_week_profit,
            last_day_profit,
            total_performance,
            last_month_performance,
            last_week_performance,
            last_day_performance,
        }
    }
}
