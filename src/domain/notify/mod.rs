//! Notify domain - price-drop summary composition

mod notification_composer;

pub use notification_composer::NotificationComposer;

use serde::Serialize;

/// A detected drop ready for notification: the check result plus the days
/// remaining in the watch window at detection time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropInfo {
    pub id: String,
    pub sku: String,
    pub title: Option<String>,
    pub paid_price: f64,
    pub current_price: f64,
    pub price_drop: f64,
    pub days_left: i64,
}

/// Composed notification content, ready for a mail envelope
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}
