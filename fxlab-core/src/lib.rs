//! FXLab Core — event-driven replay of historical bar series through a
//! trading strategy.
//!
//! The heart of the crate is the simulation loop:
//! - Domain types (bars, the validated series, orders, the account ledger)
//! - Bar-by-bar replay with pending-order resolution ahead of each tick
//! - Order router with bid/ask price-side selection and commission
//! - Daily performance summary (curve, P&L, Sharpe, max drawdown)
//! - A vectorized batch mode for signal-series strategies
//! - Run fingerprinting for reproducible artifact ids

pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod strategy;
pub mod summary;
pub mod vector;

pub use domain::{Bar, BarSeries, Field, Ledger, OrderKind, OrderRequest, PendingOrder, SeriesError};
pub use engine::{run_replay, EngineConfig, EngineError, PlotSample, ReplayResult, SimContext};
pub use fingerprint::{RunConfig, StrategyParams};
pub use strategy::{BollingerReversion, Strategy};
pub use summary::{summarize, Summary};
pub use vector::{run_vector, VectorConfig};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the types that cross crate or thread boundaries
    /// are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<BarSeries>();
        require_sync::<BarSeries>();
        require_send::<OrderKind>();
        require_sync::<OrderKind>();
        require_send::<OrderRequest>();
        require_sync::<OrderRequest>();
        require_send::<PendingOrder>();
        require_sync::<PendingOrder>();
        require_send::<Ledger>();
        require_sync::<Ledger>();
        require_send::<EngineConfig>();
        require_sync::<EngineConfig>();
        require_send::<ReplayResult>();
        require_sync::<ReplayResult>();
        require_send::<Summary>();
        require_sync::<Summary>();
        require_send::<RunConfig>();
        require_sync::<RunConfig>();
        require_send::<BollingerReversion>();
        require_sync::<BollingerReversion>();
    }
}
