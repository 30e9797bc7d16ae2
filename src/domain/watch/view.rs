//! Read-time purchase view with derived window fields

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{days_left, expires_at, is_eligible};
use crate::shared::types::PurchaseRecord;

/// Purchase record enriched with derived fields. Computed per request from the
/// stored fields, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseView {
    pub id: String,
    pub sku: String,
    pub title: Option<String>,
    pub paid_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub watched: bool,
    pub last_price: Option<f64>,
    pub last_checked: Option<DateTime<Utc>>,
    pub is_watched_now: bool,
    pub expires_at: DateTime<Utc>,
    pub days_left: i64,
}

impl PurchaseView {
    pub fn from_record(record: &PurchaseRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id.clone(),
            sku: record.sku.clone(),
            title: record.title.clone(),
            paid_price: record.paid_price,
            purchase_date: record.purchase_date,
            watched: record.watched,
            last_price: record.last_price,
            last_checked: record.last_checked,
            is_watched_now: is_eligible(record, now),
            expires_at: expires_at(record.purchase_date),
            days_left: days_left(record, now),
        }
    }
}
