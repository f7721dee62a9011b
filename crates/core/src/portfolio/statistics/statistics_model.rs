use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Profit and performance over the four trailing windows ending "now".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowedReturns {
    pub total_profit: Decimal,
    pub last_month_profit: Decimal,
    pub last_week_profit: Decimal,
    pub last_day_profit: Decimal,
    pub total_performance: Decimal,
    pub last_month_performance: Decimal,
    pub last_week_performance: Decimal,
    pub last_day_performance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStatistics {
    pub position_id: String,
    #[serde(flatten)]
    pub returns: WindowedReturns,
    pub break_even_point: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStatistics {
    pub portfolio_id: String,
    #[serde(flatten)]
    pub returns: WindowedReturns,
}
