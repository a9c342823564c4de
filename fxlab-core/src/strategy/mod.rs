//! Strategy seam — the pluggable unit driven by the replay loop.

pub mod bollinger;

pub use bollinger::{BollingerReversion, BollingerState};

use crate::engine::SimContext;

/// A trading strategy replayed bar by bar.
///
/// # Invariants
/// - `step()` runs once per replayed tick, strictly in timestamp order
/// - all strategy-private indicator state lives in `State`, created by
///   `initialize` and threaded through every `step` — never stashed on the
///   shared context, so strategies sharing an engine cannot collide
/// - order submissions route synchronously inside `step`
pub trait Strategy {
    /// Indicator state owned by this strategy for the duration of a run.
    type State;

    /// Build the initial indicator state. Runs once, before the first tick.
    fn initialize(&self, ctx: &SimContext<'_>) -> Self::State;

    /// React to one bar: read history and position, submit orders.
    fn step(&self, state: &mut Self::State, ctx: &mut SimContext<'_>);
}
