//! Vectorized batch mode — aggregate arithmetic over a full order series.
//!
//! No pending orders and no per-tick callbacks: the caller supplies one
//! signed order quantity per bar, positions are forced flat at each day's
//! close, and the cash-flow model crosses the bid/ask spread proportionally
//! to order direction. Summary outputs match the event-driven replay.

use crate::domain::BarSeries;
use crate::engine::EngineError;
use crate::summary::{max_drawdown, sharpe, Summary};
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

/// Batch-mode parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorConfig {
    /// Proportional transaction cost.
    pub commission: f64,
    /// Timestamp at which each day's net position is offset. The offset is
    /// injected only when a bar exists at exactly this time of day.
    pub end_of_day: NaiveTime,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            commission: 2e-5,
            end_of_day: NaiveTime::from_hms_opt(16, 0, 0).expect("valid end-of-day time"),
        }
    }
}

/// Run the batch backtest over one order quantity per bar.
///
/// Fails only when the order series does not line up with the bar series.
pub fn run_vector(
    series: &BarSeries,
    orders: &[f64],
    config: &VectorConfig,
) -> Result<Summary, EngineError> {
    if orders.len() != series.len() {
        return Err(EngineError::OrderSeriesMismatch {
            orders: orders.len(),
            bars: series.len(),
        });
    }

    // Force flat at each day's close: net the day's orders and inject the
    // offset at the end-of-day bar, when one exists at that exact time.
    let mut adjusted = orders.to_vec();
    let mut net_by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (bar, &order) in series.bars().iter().zip(orders) {
        *net_by_day.entry(bar.date).or_insert(0.0) += order;
    }
    for (&date, &net) in &net_by_day {
        if let Some(offset_tick) = series.index_of(date.and_time(config.end_of_day)) {
            adjusted[offset_tick] -= net;
        }
    }

    // Spread-crossing cash flow, proportional to order direction.
    let c = config.commission;
    let mut pnl_by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut traded_by_day: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    for (bar, &order) in series.bars().iter().zip(&adjusted) {
        let dir = if order > 0.0 {
            1.0
        } else if order < 0.0 {
            -1.0
        } else {
            0.0
        };
        let cash_flow = (-0.5 * bar.bid_open * (1.0 - dir * (1.0 - c))
            - 0.5 * bar.ask_open * (1.0 + dir * (1.0 + c)))
            * order;
        *pnl_by_day.entry(bar.date).or_insert(0.0) += cash_flow;
        *traded_by_day.entry(bar.date).or_insert(false) |= order != 0.0;
    }

    let dates: Vec<NaiveDate> = pnl_by_day.keys().copied().collect();
    let pnl: Vec<f64> = pnl_by_day.values().copied().collect();
    let mut curve = Vec::with_capacity(pnl.len());
    let mut running = 0.0;
    for &p in &pnl {
        running += p;
        curve.push(running);
    }
    let trade_days: Vec<bool> = dates.iter().map(|d| traded_by_day[d]).collect();
    let traded_day_count = trade_days.iter().filter(|&&t| t).count();

    Ok(Summary {
        sharpe: sharpe(&pnl),
        max_drawdown: max_drawdown(&curve),
        dates,
        curve,
        pnl,
        trade_days,
        traded_day_count,
    })
}
