//! The per-tick handle a strategy sees.

use super::router::route;
use crate::domain::{Bar, BarSeries, Field, Ledger, OrderKind, OrderRequest, PendingOrder};
use chrono::NaiveDateTime;
use serde::Serialize;

/// One auxiliary sample recorded by a strategy, keyed by the bar timestamp
/// it was taken at. Collected for downstream charting; the engine never
/// reads these back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSample {
    pub timestamp: NaiveDateTime,
    pub name: String,
    pub value: f64,
}

/// Read/write view over the replay state, scoped to a single tick.
///
/// Reads cover history, the current position, and the position-signed price
/// change since the last deal. The single write path is [`order`]: requests
/// route synchronously, so a strategy can submit several per tick and see
/// each fill reflected in `position()` before the next.
///
/// [`order`]: SimContext::order
pub struct SimContext<'a> {
    series: &'a BarSeries,
    tick: usize,
    commission: f64,
    price_change: f64,
    ledger: &'a mut Ledger,
    pending: &'a mut Vec<PendingOrder>,
    plots: &'a mut Vec<PlotSample>,
}

impl<'a> SimContext<'a> {
    pub(crate) fn new(
        series: &'a BarSeries,
        tick: usize,
        commission: f64,
        price_change: f64,
        ledger: &'a mut Ledger,
        pending: &'a mut Vec<PendingOrder>,
        plots: &'a mut Vec<PlotSample>,
    ) -> Self {
        Self {
            series,
            tick,
            commission,
            price_change,
            ledger,
            pending,
            plots,
        }
    }

    /// Current bar offset.
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Timestamp of the current bar.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.bar().timestamp
    }

    /// The current bar.
    pub fn bar(&self) -> &Bar {
        &self.series.bars()[self.tick]
    }

    /// Signed open position.
    pub fn position(&self) -> f64 {
        self.ledger.position()
    }

    /// Current cash balance.
    pub fn cash(&self) -> f64 {
        self.ledger.cash()
    }

    /// Return since the last executed deal, signed by position direction:
    /// negative means the open position is under water. Zero when flat.
    pub fn price_change(&self) -> f64 {
        self.price_change
    }

    /// The last `n` bars including the current one, clamped at the start of
    /// the series.
    pub fn history(&self, n: usize) -> &[Bar] {
        self.series.window(self.tick, n)
    }

    /// The last `n` values of one named field, oldest first, including the
    /// current bar.
    pub fn history_values(&self, field: Field, n: usize) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        self.history(n).iter().map(|bar| bar.field(field)).collect()
    }

    /// Submit an order. Immediate kinds fill before this returns;
    /// conditional kinds join the pending queue for the next tick.
    pub fn order(&mut self, quantity: f64, kind: OrderKind, price: Option<f64>) {
        let request = OrderRequest {
            quantity,
            kind,
            price,
        };
        let bar = &self.series.bars()[self.tick];
        route(
            &request,
            self.tick,
            bar,
            self.commission,
            self.ledger,
            self.pending,
        );
    }

    /// Record an auxiliary sample keyed by the current timestamp.
    pub fn plot(&mut self, name: &str, value: f64) {
        let timestamp = self.timestamp();
        self.plots.push(PlotSample {
            timestamp,
            name: name.to_string(),
            value,
        });
    }
}
