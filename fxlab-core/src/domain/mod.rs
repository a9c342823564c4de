//! Domain types: bars, the bar series, orders, and the account ledger.

pub mod bar;
pub mod ledger;
pub mod order;
pub mod series;

pub use bar::{Bar, Field};
pub use ledger::Ledger;
pub use order::{OrderKind, OrderRequest, PendingOrder};
pub use series::{BarSeries, SeriesError};
