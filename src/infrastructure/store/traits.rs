//! Persistence interface traits
//! The check engine only ever touches `last_price`/`last_checked` through the
//! partial updates below; user edits go through `update`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::shared::errors::StoreError;
use crate::shared::types::{PurchaseRecord, UserAccount};

/// CRUD plus the check-engine partial updates over purchase records
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn create(&self, record: PurchaseRecord) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<PurchaseRecord>, StoreError>;

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PurchaseRecord>, StoreError>;

    /// Coarse eligibility pre-filter: watched records purchased at or after
    /// `cutoff`. Callers still apply the exact in-memory eligibility check.
    async fn watched_since(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<PurchaseRecord>, StoreError>;

    async fn update(&self, record: PurchaseRecord) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Advance `last_checked` only, leaving every other field untouched
    async fn mark_checked(&self, id: &str, checked_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Record an observed price: sets `last_price` and advances `last_checked`
    async fn record_price(
        &self,
        id: &str,
        current_price: Option<f64>,
        checked_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// User identity lookups for the batch driver
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: UserAccount) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Users owning at least one record matching the coarse pre-filter
    async fn users_with_watched_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<UserAccount>, StoreError>;
}
