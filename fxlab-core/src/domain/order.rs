//! Order requests and the one-tick pending order.

use serde::{Deserialize, Serialize};

/// How an order executes.
///
/// The two conditional kinds defer one bar and are re-evaluated against the
/// next bar's range; the others fill immediately at the current close-side
/// quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// Fill now: buys lift the ask close, sells hit the bid close.
    Market,
    /// Marketable limit crossing the opposite side of the book: buys fill
    /// at the bid close, sells at the ask close.
    LimitImmediate,
    /// Limit for one bar; if unfilled, converted to a market order.
    LimitThenMarket,
    /// Limit for one bar; if unfilled, cancelled silently.
    LimitThenCancel,
}

/// A strategy's order submission. Transient: consumed by the router.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderRequest {
    /// Signed quantity: positive buys, negative sells.
    pub quantity: f64,
    pub kind: OrderKind,
    /// Explicit execution price overriding the quote-side close.
    pub price: Option<f64>,
}

impl OrderRequest {
    pub fn market(quantity: f64) -> Self {
        Self {
            quantity,
            kind: OrderKind::Market,
            price: None,
        }
    }
}

/// A conditional order carried from one bar to the next.
///
/// Created by the router when a conditional request is submitted, consumed
/// by resolution on the following tick. Never outlives a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingOrder {
    pub quantity: f64,
    pub kind: OrderKind,
    /// Quote-side close recorded at placement; the next bar's range is
    /// tested against this level.
    pub trigger_price: f64,
}
