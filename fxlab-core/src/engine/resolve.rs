//! Pending-order resolution — one bar after placement, against the new range.

use super::router::fill_market;
use super::EngineError;
use crate::domain::{Bar, Ledger, OrderKind, PendingOrder};
use tracing::debug;

/// Resolve every order deferred from the prior bar.
///
/// A pending buy fills when the current bar trades strictly below its
/// trigger (`low < trigger`); a pending sell when the bar trades strictly
/// above it (`high > trigger`). Touching the level exactly never fills —
/// ties resolve to "not filled" so replays stay reproducible.
///
/// Filled entries execute at their trigger price, bypassing quote-side
/// selection. Unfilled `LimitThenMarket` entries convert to market orders
/// at the current quote-side close; unfilled `LimitThenCancel` entries are
/// dropped without touching the ledger. An immediate kind in the queue is a
/// malformed order flow and aborts the run.
pub fn resolve_pending(
    queue: Vec<PendingOrder>,
    tick: usize,
    bar: &Bar,
    commission: f64,
    ledger: &mut Ledger,
) -> Result<(), EngineError> {
    for order in queue {
        let filled = (order.quantity > 0.0 && bar.low < order.trigger_price)
            || (order.quantity < 0.0 && bar.high > order.trigger_price);

        if filled {
            debug!(
                tick,
                quantity = order.quantity,
                trigger_price = order.trigger_price,
                "pending order filled at trigger"
            );
            fill_market(
                order.quantity,
                Some(order.trigger_price),
                tick,
                bar,
                commission,
                ledger,
            );
            continue;
        }

        match order.kind {
            OrderKind::LimitThenMarket => {
                debug!(
                    tick,
                    quantity = order.quantity,
                    "unfilled limit converted to market"
                );
                fill_market(order.quantity, None, tick, bar, commission, ledger);
            }
            OrderKind::LimitThenCancel => {
                debug!(tick, quantity = order.quantity, "unfilled limit cancelled");
            }
            OrderKind::Market | OrderKind::LimitImmediate => {
                return Err(EngineError::InvalidOrderKind(order.kind));
            }
        }
    }
    Ok(())
}
