//! Pricewatch - purchase price-drop watcher
//! Built with Domain-Driven Design principles

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;

// Re-export main types for convenience
pub use domain::check::PriceCheckEngine;
pub use domain::notify::NotificationComposer;
pub use application::{PurchaseService, WatchBatch};
