//! In-memory store backed by shared maps

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::traits::{PurchaseStore, UserStore};
use crate::shared::errors::StoreError;
use crate::shared::types::{PurchaseRecord, UserAccount};

/// Snapshot of everything the store holds. Shared between the in-memory and
/// JSON-file backends so both apply identical update semantics.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(super) struct StoreState {
    pub purchases: HashMap<String, PurchaseRecord>,
    pub users: HashMap<String, UserAccount>,
}

impl StoreState {
    pub fn insert_purchase(&mut self, record: PurchaseRecord) {
        self.purchases.insert(record.id.clone(), record);
    }

    pub fn list_for_user(&self, user_id: &str) -> Vec<PurchaseRecord> {
        let mut records: Vec<_> = self
            .purchases
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        records
    }

    pub fn watched_since(&self, user_id: &str, cutoff: DateTime<Utc>) -> Vec<PurchaseRecord> {
        let mut records: Vec<_> = self
            .purchases
            .values()
            .filter(|p| p.user_id == user_id && p.watched && p.purchase_date >= cutoff)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        records
    }

    pub fn update_purchase(&mut self, record: PurchaseRecord) -> Result<(), StoreError> {
        if !self.purchases.contains_key(&record.id) {
            return Err(StoreError::RecordNotFound(record.id));
        }
        self.purchases.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn delete_purchase(&mut self, id: &str) -> Result<(), StoreError> {
        self.purchases
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))
    }

    pub fn mark_checked(&mut self, id: &str, checked_at: DateTime<Utc>) -> Result<(), StoreError> {
        let record = self
            .purchases
            .get_mut(id)
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        record.last_checked = Some(clamp_forward(record.last_checked, checked_at));
        Ok(())
    }

    pub fn record_price(
        &mut self,
        id: &str,
        current_price: Option<f64>,
        checked_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let record = self
            .purchases
            .get_mut(id)
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        record.last_price = current_price;
        record.last_checked = Some(clamp_forward(record.last_checked, checked_at));
        Ok(())
    }

    pub fn insert_user(&mut self, user: UserAccount) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn users_with_watched_since(&self, cutoff: DateTime<Utc>) -> Vec<UserAccount> {
        let mut users: Vec<_> = self
            .users
            .values()
            .filter(|u| {
                self.purchases
                    .values()
                    .any(|p| p.user_id == u.id && p.watched && p.purchase_date >= cutoff)
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        users
    }
}

/// `last_checked` is monotonically non-decreasing: overlapping runs may apply
/// updates out of order, but a newer timestamp is never overwritten by an
/// older one.
fn clamp_forward(previous: Option<DateTime<Utc>>, next: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(prev) if prev > next => prev,
        _ => next,
    }
}

/// In-memory purchase/user store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PurchaseStore for MemoryStore {
    async fn create(&self, record: PurchaseRecord) -> Result<(), StoreError> {
        self.state.write().await.insert_purchase(record);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<PurchaseRecord>, StoreError> {
        Ok(self.state.read().await.purchases.get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PurchaseRecord>, StoreError> {
        Ok(self.state.read().await.list_for_user(user_id))
    }

    async fn watched_since(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<PurchaseRecord>, StoreError> {
        Ok(self.state.read().await.watched_since(user_id, cutoff))
    }

    async fn update(&self, record: PurchaseRecord) -> Result<(), StoreError> {
        self.state.write().await.update_purchase(record)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.state.write().await.delete_purchase(id)
    }

    async fn mark_checked(&self, id: &str, checked_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.state.write().await.mark_checked(id, checked_at)
    }

    async fn record_price(
        &self,
        id: &str,
        current_price: Option<f64>,
        checked_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .record_price(id, current_price, checked_at)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: UserAccount) -> Result<(), StoreError> {
        self.state.write().await.insert_user(user);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn users_with_watched_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<UserAccount>, StoreError> {
        Ok(self.state.read().await.users_with_watched_since(cutoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn watched_record(user_id: &str, days_ago: i64) -> PurchaseRecord {
        PurchaseRecord::new(
            user_id,
            "1234567",
            None,
            100.0,
            now() - Duration::days(days_ago),
            true,
        )
    }

    #[tokio::test]
    async fn test_watched_since_applies_coarse_filter() {
        let store = MemoryStore::new();
        let fresh = watched_record("u1", 5);
        let stale = watched_record("u1", 40);
        let mut unwatched = watched_record("u1", 5);
        unwatched.watched = false;

        PurchaseStore::create(&store, fresh.clone()).await.unwrap();
        PurchaseStore::create(&store, stale).await.unwrap();
        PurchaseStore::create(&store, unwatched).await.unwrap();

        let cutoff = now() - Duration::days(30);
        let found = store.watched_since("u1", cutoff).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, fresh.id);
    }

    #[tokio::test]
    async fn test_mark_checked_leaves_other_fields_alone() {
        let store = MemoryStore::new();
        let record = watched_record("u1", 5);
        PurchaseStore::create(&store, record.clone()).await.unwrap();

        store.mark_checked(&record.id, now()).await.unwrap();

        let stored = PurchaseStore::get(&store, &record.id).await.unwrap().unwrap();
        assert_eq!(stored.last_checked, Some(now()));
        assert_eq!(stored.last_price, None);
        assert_eq!(stored.paid_price, record.paid_price);
    }

    #[tokio::test]
    async fn test_last_checked_is_monotonic() {
        let store = MemoryStore::new();
        let record = watched_record("u1", 5);
        PurchaseStore::create(&store, record.clone()).await.unwrap();

        let later = now() + Duration::minutes(10);
        store.record_price(&record.id, Some(80.0), later).await.unwrap();
        // an out-of-order older update must not move last_checked backwards
        store.mark_checked(&record.id, now()).await.unwrap();

        let stored = PurchaseStore::get(&store, &record.id).await.unwrap().unwrap();
        assert_eq!(stored.last_checked, Some(later));
        assert_eq!(stored.last_price, Some(80.0));
    }

    #[tokio::test]
    async fn test_users_with_watched_since() {
        let store = MemoryStore::new();
        UserStore::create(&store, UserAccount::new("u1", Some("a@example.com".to_string())))
            .await
            .unwrap();
        UserStore::create(&store, UserAccount::new("u2", Some("b@example.com".to_string())))
            .await
            .unwrap();
        PurchaseStore::create(&store, watched_record("u1", 5)).await.unwrap();
        PurchaseStore::create(&store, watched_record("u2", 40)).await.unwrap();

        let cutoff = now() - Duration::days(30);
        let users = store.users_with_watched_since(cutoff).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "u1");
    }

    #[tokio::test]
    async fn test_delete_missing_record_errors() {
        let store = MemoryStore::new();
        let err = store.delete("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound(_)));
    }
}
