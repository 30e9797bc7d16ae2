//! Common types used across the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchase registered by a user, optionally watched for price drops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: String,
    pub user_id: String,
    pub sku: String,
    pub title: Option<String>,
    pub paid_price: f64,
    pub purchase_date: DateTime<Utc>,
    pub watched: bool,
    pub last_price: Option<f64>,
    pub last_checked: Option<DateTime<Utc>>,
}

impl PurchaseRecord {
    pub fn new(
        user_id: impl Into<String>,
        sku: impl Into<String>,
        title: Option<String>,
        paid_price: f64,
        purchase_date: DateTime<Utc>,
        watched: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            sku: sku.into(),
            title,
            paid_price,
            purchase_date,
            watched,
            last_price: None,
            last_checked: None,
        }
    }
}

/// User identity as the batch driver sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub email: Option<String>,
}

impl UserAccount {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}
