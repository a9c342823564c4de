//! The simulation loop: sequential bar-by-bar replay.

use super::context::{PlotSample, SimContext};
use super::resolve::resolve_pending;
use super::EngineError;
use crate::domain::{BarSeries, Ledger, PendingOrder};
use crate::strategy::Strategy;
use crate::summary::{summarize, Summary};
use tracing::info;

/// Replay parameters.
///
/// The warm-up margin leaves room for rolling indicators before the first
/// strategy call; the cool-down margin stops the replay short of the data
/// tail. Both are plain parameters — nothing derives them from a strategy's
/// actual lookback.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub initial_cash: f64,
    /// Proportional transaction cost applied to notional on execution.
    pub commission: f64,
    /// Leading bars skipped before the first strategy invocation.
    pub warmup_bars: usize,
    /// Trailing bars excluded from the replay.
    pub cooldown_bars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_cash: 1_000_000.0,
            commission: 2e-5,
            warmup_bars: 200,
            cooldown_bars: 100,
        }
    }
}

/// Everything a completed replay produces.
#[derive(Debug, Clone)]
pub struct ReplayResult {
    /// Daily performance aggregation.
    pub summary: Summary,
    /// Per-tick mark-to-market values, forward-filled over untouched ticks.
    /// Ticks before the first replayed bar stay NaN.
    pub equity: Vec<f64>,
    /// Per-tick flag: at least one order filled on that bar.
    pub trade_flags: Vec<bool>,
    /// Final cash balance.
    pub cash: f64,
    /// Final signed position.
    pub position: f64,
    /// Price of the last fill, 0.0 if nothing ever traded.
    pub last_deal: f64,
    /// Auxiliary samples the strategy recorded via `plot`.
    pub plots: Vec<PlotSample>,
}

/// Drive a strategy over the bar series and aggregate performance.
///
/// Ticks run from `warmup_bars` to `len - cooldown_bars` (exclusive). Each
/// tick resolves the pending queue first, then computes the price change
/// since the last deal, invokes the strategy, and finally marks the account
/// to market at the bar's close. The only failure path is a malformed
/// pending queue, surfaced as [`EngineError::InvalidOrderKind`].
pub fn run_replay<S: Strategy>(
    series: &BarSeries,
    config: &EngineConfig,
    strategy: &S,
) -> Result<ReplayResult, EngineError> {
    let len = series.len();
    let end = len.saturating_sub(config.cooldown_bars);

    let mut ledger = Ledger::new(config.initial_cash, len);
    let mut pending: Vec<PendingOrder> = Vec::new();
    let mut plots: Vec<PlotSample> = Vec::new();

    let mut state = {
        let ctx = SimContext::new(series, 0, config.commission, 0.0, &mut ledger, &mut pending, &mut plots);
        strategy.initialize(&ctx)
    };

    info!(
        bars = len,
        warmup = config.warmup_bars,
        cooldown = config.cooldown_bars,
        "replay started"
    );

    for tick in config.warmup_bars..end {
        let bar = &series.bars()[tick];

        // 1. Resolve orders deferred from the prior tick; the queue drains
        //    every tick regardless of outcome.
        let queue = std::mem::take(&mut pending);
        resolve_pending(queue, tick, bar, config.commission, &mut ledger)?;

        // 2. Position-signed return since the last deal, for stop checks.
        let price_change = if ledger.position() == 0.0 {
            0.0
        } else {
            ledger.position().signum() * (bar.close / ledger.last_deal() - 1.0)
        };

        // 3. Strategy turn: may route any number of orders synchronously.
        let mut ctx = SimContext::new(
            series,
            tick,
            config.commission,
            price_change,
            &mut ledger,
            &mut pending,
            &mut plots,
        );
        strategy.step(&mut state, &mut ctx);

        // 4. Mark to market at this bar's close.
        let value = ledger.cash() + ledger.position() * bar.close;
        ledger.mark(tick, value);
    }

    ledger.forward_fill_marks();

    let dates: Vec<chrono::NaiveDate> = series.bars().iter().map(|b| b.date).collect();
    let summary = summarize(&dates, ledger.marks(), ledger.trade_flags());

    info!(
        traded_days = summary.traded_day_count,
        sharpe = summary.sharpe,
        max_drawdown = summary.max_drawdown,
        "replay complete"
    );

    Ok(ReplayResult {
        summary,
        equity: ledger.marks().to_vec(),
        trade_flags: ledger.trade_flags().to_vec(),
        cash: ledger.cash(),
        position: ledger.position(),
        last_deal: ledger.last_deal(),
        plots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, OrderKind};
    use chrono::NaiveDate;

    fn flat_series(n: usize, close: f64) -> BarSeries {
        let date = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();
        let bars = (0..n)
            .map(|i| Bar {
                timestamp: date.and_hms_opt(9, 0, 0).unwrap()
                    + chrono::Duration::minutes(i as i64),
                date,
                open: close,
                high: close + 0.001,
                low: close - 0.001,
                close,
                bid_open: close - 0.0001,
                ask_open: close + 0.0001,
                bid_close: close - 0.0001,
                ask_close: close + 0.0001,
                volume: 10.0,
            })
            .collect();
        BarSeries::new(bars).unwrap()
    }

    struct Idle;

    impl Strategy for Idle {
        type State = ();
        fn initialize(&self, _ctx: &SimContext<'_>) {}
        fn step(&self, _state: &mut (), _ctx: &mut SimContext<'_>) {}
    }

    #[test]
    fn idle_strategy_keeps_cash_flat() {
        let series = flat_series(20, 1.10);
        let config = EngineConfig {
            initial_cash: 1_000.0,
            commission: 0.0,
            warmup_bars: 5,
            cooldown_bars: 5,
        };
        let result = run_replay(&series, &config, &Idle).unwrap();
        assert_eq!(result.cash, 1_000.0);
        assert_eq!(result.position, 0.0);
        // Replayed ticks carry the cash value; leading ticks stay NaN.
        assert!(result.equity[4].is_nan());
        assert_eq!(result.equity[5], 1_000.0);
        // Forward fill covers the cool-down tail.
        assert_eq!(result.equity[19], 1_000.0);
    }

    #[test]
    fn margins_bound_the_strategy_calls() {
        let series = flat_series(12, 1.0);
        let config = EngineConfig {
            initial_cash: 0.0,
            commission: 0.0,
            warmup_bars: 3,
            cooldown_bars: 4,
        };
        struct Probe;
        impl Strategy for Probe {
            type State = ();
            fn initialize(&self, _ctx: &SimContext<'_>) {}
            fn step(&self, _state: &mut (), ctx: &mut SimContext<'_>) {
                let tick = ctx.tick() as f64;
                ctx.plot("tick", tick);
            }
        }
        let result = run_replay(&series, &config, &Probe).unwrap();
        let ticks: Vec<f64> = result.plots.iter().map(|p| p.value).collect();
        assert_eq!(ticks, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn warmup_beyond_series_length_replays_nothing() {
        let series = flat_series(10, 1.0);
        let config = EngineConfig {
            initial_cash: 50.0,
            commission: 0.0,
            warmup_bars: 20,
            cooldown_bars: 0,
        };
        let result = run_replay(&series, &config, &Idle).unwrap();
        assert_eq!(result.cash, 50.0);
        assert!(result.equity.iter().all(|v| v.is_nan()));
        assert!(result.summary.curve.is_empty());
    }

    #[test]
    fn conditional_order_spans_exactly_one_tick() {
        // Submit a LimitThenCancel on the first replayed tick. The ask
        // close sits below every later bar's low, so the buy never trades
        // through its trigger and dies silently one tick later.
        struct OneShot;
        impl Strategy for OneShot {
            type State = bool;
            fn initialize(&self, _ctx: &SimContext<'_>) -> bool {
                false
            }
            fn step(&self, sent: &mut bool, ctx: &mut SimContext<'_>) {
                if !*sent {
                    ctx.order(100.0, OrderKind::LimitThenCancel, None);
                    *sent = true;
                }
            }
        }

        let date = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();
        let bars: Vec<Bar> = (0..10)
            .map(|i| Bar {
                timestamp: date.and_hms_opt(9, i, 0).unwrap(),
                date,
                open: 1.0,
                high: 1.001,
                low: 1.0,
                close: 1.0,
                bid_open: 0.98,
                ask_open: 0.99,
                bid_close: 0.98,
                ask_close: 0.99,
                volume: 1.0,
            })
            .collect();
        let series = BarSeries::new(bars).unwrap();
        let config = EngineConfig {
            initial_cash: 1_000.0,
            commission: 0.0,
            warmup_bars: 2,
            cooldown_bars: 2,
        };
        let result = run_replay(&series, &config, &OneShot).unwrap();
        assert_eq!(result.position, 0.0);
        assert_eq!(result.cash, 1_000.0);
        assert!(result.trade_flags.iter().all(|&f| !f));
    }

    #[test]
    fn price_change_is_signed_by_position() {
        // Buy on the first replayed tick, then watch price_change follow the
        // rising close while long.
        struct BuyThenWatch;
        impl Strategy for BuyThenWatch {
            type State = bool;
            fn initialize(&self, _ctx: &SimContext<'_>) -> bool {
                false
            }
            fn step(&self, bought: &mut bool, ctx: &mut SimContext<'_>) {
                if !*bought {
                    assert_eq!(ctx.price_change(), 0.0); // flat
                    ctx.order(100.0, OrderKind::Market, Some(1.0));
                    *bought = true;
                } else {
                    ctx.plot("pc", ctx.price_change());
                }
            }
        }

        let date = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();
        let bars: Vec<Bar> = (0..4)
            .map(|i| {
                let close = 1.0 + i as f64 * 0.01;
                Bar {
                    timestamp: date.and_hms_opt(9, i, 0).unwrap(),
                    date,
                    open: close,
                    high: close,
                    low: close,
                    close,
                    bid_open: close,
                    ask_open: close,
                    bid_close: close,
                    ask_close: close,
                    volume: 1.0,
                }
            })
            .collect();
        let series = BarSeries::new(bars).unwrap();
        let config = EngineConfig {
            initial_cash: 1_000.0,
            commission: 0.0,
            warmup_bars: 0,
            cooldown_bars: 0,
        };
        let result = run_replay(&series, &config, &BuyThenWatch).unwrap();
        // Deal at 1.0; closes 1.01, 1.02, 1.03 → +1%, +2%, +3%.
        let changes: Vec<f64> = result.plots.iter().map(|p| p.value).collect();
        assert_eq!(changes.len(), 3);
        assert!((changes[0] - 0.01).abs() < 1e-12);
        assert!((changes[2] - 0.03).abs() < 1e-12);
    }
}
