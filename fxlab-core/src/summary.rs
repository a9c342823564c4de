//! Performance summary — pure functions over the completed mark series.
//!
//! Nothing here touches intra-tick state: the inputs are the per-tick
//! mark-to-market values, the per-tick trade flags, and the calendar dates,
//! all produced by a finished replay (or the vectorized mode).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Guards the Sharpe denominator so a zero-variance P&L series yields a
/// finite ratio instead of NaN.
pub const SHARPE_EPSILON: f64 = 1e-9;

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Daily performance aggregation of one run.
///
/// All vectors are parallel, keyed by `dates`. Recomputed from scratch on
/// demand — never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub dates: Vec<NaiveDate>,
    /// Last mark-to-market value observed each day (forward-filled gaps).
    pub curve: Vec<f64>,
    /// First difference of `curve`; the first day is 0.0, never missing.
    pub pnl: Vec<f64>,
    /// Per day: did at least one order fill? Several fills on one day still
    /// count the day once.
    pub trade_days: Vec<bool>,
    /// Number of days with at least one fill.
    pub traded_day_count: usize,
    /// Annualized mean-to-volatility ratio of daily P&L.
    pub sharpe: f64,
    /// Largest peak-to-trough fractional decline of the daily curve.
    pub max_drawdown: f64,
}

/// Aggregate per-tick marks and trade flags into the daily summary.
///
/// Days that end before the first recorded mark are excluded; from the
/// first finite mark onward every day contributes its last value.
pub fn summarize(dates: &[NaiveDate], marks: &[f64], trade_flags: &[bool]) -> Summary {
    let mut day_dates: Vec<NaiveDate> = Vec::new();
    let mut curve: Vec<f64> = Vec::new();
    let mut trade_days: Vec<bool> = Vec::new();

    let mut i = 0;
    while i < dates.len() {
        let date = dates[i];
        let mut last_mark = f64::NAN;
        let mut traded = false;
        while i < dates.len() && dates[i] == date {
            if marks[i].is_finite() {
                last_mark = marks[i];
            }
            traded |= trade_flags[i];
            i += 1;
        }
        if last_mark.is_finite() {
            day_dates.push(date);
            curve.push(last_mark);
            trade_days.push(traded);
        }
    }

    let pnl = daily_pnl(&curve);
    let traded_day_count = trade_days.iter().filter(|&&t| t).count();

    Summary {
        sharpe: sharpe(&pnl),
        max_drawdown: max_drawdown(&curve),
        dates: day_dates,
        curve,
        pnl,
        trade_days,
        traded_day_count,
    }
}

/// First difference of the daily curve; the first day's P&L is 0.0.
pub fn daily_pnl(curve: &[f64]) -> Vec<f64> {
    if curve.is_empty() {
        return Vec::new();
    }
    let mut pnl = Vec::with_capacity(curve.len());
    pnl.push(0.0);
    pnl.extend(curve.windows(2).map(|w| w[1] - w[0]));
    pnl
}

/// Annualized Sharpe ratio of a daily P&L series.
///
/// `mean / (std + epsilon) * sqrt(252)` — the epsilon keeps the result
/// finite when the P&L never varies. Sample standard deviation.
pub fn sharpe(pnl: &[f64]) -> f64 {
    mean_f64(pnl) / (std_dev(pnl) + SHARPE_EPSILON) * TRADING_DAYS.sqrt()
}

/// Maximum fractional drawdown: the largest value of
/// `(running_max - value) / running_max` over the curve.
///
/// Zero for a monotonically non-decreasing curve. Stretches where the
/// running maximum is not positive are skipped.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &value in curve {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
