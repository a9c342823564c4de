//! Replay engine — order routing, pending resolution, and the tick loop.
//!
//! Per tick, in order:
//! 1. Resolve every pending conditional order against the current bar
//! 2. Compute the position-signed price change since the last deal
//! 3. Invoke the strategy, which may route orders through the context
//! 4. Mark the account to market at the bar's close

pub mod context;
pub mod replay;
pub mod resolve;
pub mod router;

use crate::domain::OrderKind;
use thiserror::Error;

pub use context::{PlotSample, SimContext};
pub use replay::{run_replay, EngineConfig, ReplayResult};
pub use resolve::resolve_pending;
pub use router::route;

/// Fatal engine failures. Surfaced to the replay caller; never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// An immediate order kind was found in the pending queue. Only the
    /// conditional kinds may ever be deferred; anything else means the
    /// order flow is malformed.
    #[error("order kind {0:?} cannot be resolved from the pending queue")]
    InvalidOrderKind(OrderKind),

    /// The vectorized mode was handed an order series that does not line up
    /// with the bar series.
    #[error("order series holds {orders} entries but the bar series holds {bars}")]
    OrderSeriesMismatch { orders: usize, bars: usize },
}
