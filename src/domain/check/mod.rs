//! Check domain - the watch-window price-check engine

mod pacer;
mod price_check_engine;

pub use pacer::{CallPacer, FixedDelayPacer, NoopPacer};
pub use price_check_engine::PriceCheckEngine;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of checking a single record. Transient - produced per run, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCheckResult {
    pub id: String,
    pub sku: String,
    pub title: Option<String>,
    pub paid_price: f64,
    pub current_price: Option<f64>,
    pub price_drop: f64,
}

/// Accumulated outcome of one user's check run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub checked_at: DateTime<Utc>,
    pub results: Vec<PriceCheckResult>,
}
