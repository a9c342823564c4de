//! Order routing — immediate execution and conditional enqueueing.

use crate::domain::{Bar, Ledger, OrderKind, OrderRequest, PendingOrder};
use tracing::debug;

/// Route one order request against the current bar.
///
/// Market and limit-immediate requests fill synchronously, mutating the
/// ledger. Conditional requests are deferred: they join the pending queue
/// armed with the current quote-side close as trigger and are evaluated
/// against the next bar's range. Submission itself cannot fail — the kind
/// enum is matched exhaustively.
pub fn route(
    request: &OrderRequest,
    tick: usize,
    bar: &Bar,
    commission: f64,
    ledger: &mut Ledger,
    pending: &mut Vec<PendingOrder>,
) {
    match request.kind {
        OrderKind::Market => {
            fill_market(request.quantity, request.price, tick, bar, commission, ledger);
        }
        OrderKind::LimitImmediate => {
            fill_limit_immediate(request.quantity, request.price, tick, bar, commission, ledger);
        }
        OrderKind::LimitThenMarket | OrderKind::LimitThenCancel => {
            let trigger_price = if request.quantity > 0.0 {
                bar.ask_close
            } else {
                bar.bid_close
            };
            debug!(
                tick,
                quantity = request.quantity,
                trigger_price,
                kind = ?request.kind,
                "conditional order queued"
            );
            pending.push(PendingOrder {
                quantity: request.quantity,
                kind: request.kind,
                trigger_price,
            });
        }
    }
}

/// Execute with market price-side selection: buys lift the ask close, sells
/// hit the bid close, unless an explicit price overrides the quote.
///
/// A zero quantity marks the tick as traded but moves nothing.
pub(crate) fn fill_market(
    quantity: f64,
    explicit: Option<f64>,
    tick: usize,
    bar: &Bar,
    commission: f64,
    ledger: &mut Ledger,
) {
    let price = if quantity > 0.0 {
        explicit.unwrap_or(bar.ask_close)
    } else if quantity < 0.0 {
        explicit.unwrap_or(bar.bid_close)
    } else {
        ledger.flag_trade(tick);
        return;
    };
    ledger.apply_fill(tick, price, quantity, commission);
    debug!(tick, price, quantity, "market order filled");
}

/// Execute with the price side reversed: buys fill at the bid close, sells
/// at the ask close — an aggressively priced limit crossing the opposite
/// side of the book.
pub(crate) fn fill_limit_immediate(
    quantity: f64,
    explicit: Option<f64>,
    tick: usize,
    bar: &Bar,
    commission: f64,
    ledger: &mut Ledger,
) {
    let price = if quantity > 0.0 {
        explicit.unwrap_or(bar.bid_close)
    } else if quantity < 0.0 {
        explicit.unwrap_or(bar.ask_close)
    } else {
        ledger.flag_trade(tick);
        return;
    };
    ledger.apply_fill(tick, price, quantity, commission);
    debug!(tick, price, quantity, "limit-immediate order filled");
}
