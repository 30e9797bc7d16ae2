//! Application layer - use cases and drivers

pub mod purchases;
pub mod watch_batch;

pub use purchases::{NewPurchase, PurchaseEdit, PurchaseService};
pub use watch_batch::{BatchStats, WatchBatch};
