use chrono::{DateTime, Utc};
use log::{debug, warn};
use num_traits::ToPrimitive;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators_traits::PerformanceCalculatorTrait;
use crate::constants::{IRR_INITIAL_UPPER_BOUND, IRR_LOWER_BOUND};
use crate::portfolio::positions::PositionPriceRangeData;
use crate::settings::CalculatorSettings;

/// A signed cash movement: negative when money goes into the position,
/// positive when it comes back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub timestamp: DateTime<Utc>,
    pub amount: Decimal,
}

/// Cash-flow stream of one position over `[from, to]`.
///
/// The holding carried into `from` is treated as bought at `from` for its
/// market value, the holding at `to` as sold at `to` for its market value.
/// Transactions in `[from, to]` are flows at their own price.
pub fn position_cash_flows(
    position: &PositionPriceRangeData,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<CashFlow> {
    let mut flows = Vec::new();

    let opening_value = position.opening_value(from);
    if !opening_value.is_zero() {
        flows.push(CashFlow {
            timestamp: from,
            amount: -opening_value,
        });
    }

    flows.extend(
        position
            .transactions_between(from, to)
            .iter()
            .filter(|t| !t.invested().is_zero())
            .map(|t| CashFlow {
                timestamp: t.timestamp,
                amount: -t.invested(),
            }),
    );

    let closing_value = position.closing_value(to);
    if !closing_value.is_zero() {
        flows.push(CashFlow {
            timestamp: to,
            amount: closing_value,
        });
    }

    flows
}

/// Solves the internal rate of return of a time-ordered cash-flow stream.
///
/// Flows are discounted by `(1 + r)^((t - t_first) / (t_last - t_first))`, so
/// the rate is the holding-period rate over the span of the stream rather
/// than an annualized one. Returns zero when nothing was invested and -1 when
/// nothing came back.
pub fn holding_period_rate(flows: &[CashFlow], settings: &CalculatorSettings) -> Decimal {
    let invested: Decimal = flows
        .iter()
        .filter(|f| f.amount < Decimal::ZERO)
        .map(|f| -f.amount)
        .sum();
    let returned: Decimal = flows
        .iter()
        .filter(|f| f.amount > Decimal::ZERO)
        .map(|f| f.amount)
        .sum();

    if invested.is_zero() {
        return Decimal::ZERO;
    }
    if returned.is_zero() {
        return Decimal::NEGATIVE_ONE;
    }

    let (first, last) = match (flows.first(), flows.last()) {
        (Some(first), Some(last)) => (first.timestamp, last.timestamp),
        _ => return Decimal::ZERO,
    };
    let span_seconds = (last - first).num_seconds();
    if span_seconds <= 0 {
        // All flows share one instant: discounting has no effect.
        return (returned / invested - Decimal::ONE).round_dp(settings.result_precision);
    }

    let points: Vec<(f64, f64)> = flows
        .iter()
        .map(|f| {
            let elapsed = (f.timestamp - first).num_seconds() as f64 / span_seconds as f64;
            (elapsed, f.amount.to_f64().unwrap_or(0.0))
        })
        .collect();

    let rate = solve_rate(&points, settings);
    Decimal::from_f64_retain(rate)
        .unwrap_or(Decimal::ZERO)
        .round_dp(settings.result_precision)
}

fn npv(points: &[(f64, f64)], rate: f64) -> f64 {
    let base = 1.0 + rate;
    points.iter().map(|(t, amount)| amount / base.powf(*t)).sum()
}

fn npv_slope(points: &[(f64, f64)], rate: f64) -> f64 {
    let base = 1.0 + rate;
    points
        .iter()
        .map(|(t, amount)| -t * amount / base.powf(t + 1.0))
        .sum()
}

/// Newton-Raphson from zero, bisection when Newton leaves the domain or
/// stalls. Both are capped, so this always terminates.
fn solve_rate(points: &[(f64, f64)], settings: &CalculatorSettings) -> f64 {
    let mut rate = 0.0_f64;
    let mut best_rate = rate;
    let mut best_residual = f64::INFINITY;

    for _ in 0..settings.irr_max_iterations {
        let value = npv(points, rate);
        if !value.is_finite() {
            break;
        }
        if value.abs() < best_residual {
            best_rate = rate;
            best_residual = value.abs();
        }

        let slope = npv_slope(points, rate);
        if slope == 0.0 || !slope.is_finite() {
            break;
        }

        let next = rate - value / slope;
        if !next.is_finite() || next <= IRR_LOWER_BOUND {
            break;
        }
        if (next - rate).abs() < settings.irr_tolerance {
            return next;
        }
        rate = next;
    }

    debug!("Newton-Raphson did not converge from {}, bisecting", rate);
    match bisect(points, settings) {
        Some(root) => root,
        None if loss_below_lower_bound(points) => {
            warn!("IRR is below {}; clamping to the lower bound", IRR_LOWER_BOUND);
            IRR_LOWER_BOUND
        }
        None => {
            warn!(
                "IRR solver found no sign change; returning best estimate {} (|npv| = {})",
                best_rate, best_residual
            );
            best_rate
        }
    }
}

/// NPV still negative at the lowest rate probed: the loss is deeper than the
/// bracket can express.
fn loss_below_lower_bound(points: &[(f64, f64)]) -> bool {
    let at_lower = npv(points, IRR_LOWER_BOUND);
    let at_upper = npv(points, IRR_INITIAL_UPPER_BOUND);
    at_lower.is_finite() && at_upper.is_finite() && at_lower < 0.0 && at_upper < 0.0
}

fn bisect(points: &[(f64, f64)], settings: &CalculatorSettings) -> Option<f64> {
    let mut low = IRR_LOWER_BOUND;
    let mut high = IRR_INITIAL_UPPER_BOUND;
    let mut low_value = npv(points, low);
    let mut high_value = npv(points, high);
    if !low_value.is_finite() || !high_value.is_finite() {
        return None;
    }

    let mut expansions = 0;
    while low_value.signum() == high_value.signum() {
        if expansions >= settings.irr_max_iterations {
            return None;
        }
        high *= 2.0;
        high_value = npv(points, high);
        if !high_value.is_finite() {
            return None;
        }
        expansions += 1;
    }

    for _ in 0..settings.irr_max_iterations {
        let mid = (low + high) / 2.0;
        let value = npv(points, mid);
        if value == 0.0 || (high - low) / 2.0 < settings.irr_tolerance {
            return Some(mid);
        }
        if value.signum() == low_value.signum() {
            low = mid;
            low_value = value;
        } else {
            high = mid;
        }
    }

    warn!("IRR bisection hit the iteration cap");
    Some((low + high) / 2.0)
}

/// Rate of return from the pooled cash flows of every position.
#[derive(Debug, Clone, Default)]
pub struct PerformanceCalculator {
    settings: CalculatorSettings,
}

impl PerformanceCalculator {
    pub fn new(settings: CalculatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }
}

impl PerformanceCalculatorTrait for PerformanceCalculator {
    fn calculate_performance(
        &self,
        positions: &[PositionPriceRangeData],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Decimal {
        let mut flows: Vec<CashFlow> = positions
            .par_iter()
            .flat_map_iter(|position| position_cash_flows(position, from, to))
            .collect();
        if flows.is_empty() {
            return Decimal::ZERO;
        }
        flows.sort_by_key(|f| f.timestamp);

        holding_period_rate(&flows, &self.settings)
    }
}
