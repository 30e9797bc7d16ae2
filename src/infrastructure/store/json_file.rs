//! JSON-file store - the in-memory state snapshotted to disk on each mutation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::memory::StoreState;
use super::traits::{PurchaseStore, UserStore};
use crate::shared::errors::StoreError;
use crate::shared::types::{PurchaseRecord, UserAccount};

/// File-backed purchase/user store for the CLI. Loads the full snapshot at
/// startup and rewrites it after every mutation; reads are served from memory.
/// Overlapping check runs are last-write-wins on `last_price`/`last_checked`,
/// a known, accepted race for this domain.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Arc<RwLock<StoreState>>,
}

impl JsonFileStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            StoreState::default()
        };
        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    fn persist(&self, state: &StoreState) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, raw)?;
        debug!("Persisted store snapshot to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl PurchaseStore for JsonFileStore {
    async fn create(&self, record: PurchaseRecord) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.insert_purchase(record);
        self.persist(&state)
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
        let mut state = self.state.write().await;
        state.update_purchase(record)?;
        self.persist(&state)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.delete_purchase(id)?;
        self.persist(&state)
    }

    async fn mark_checked(&self, id: &str, checked_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.mark_checked(id, checked_at)?;
        self.persist(&state)
    }

    async fn record_price(
        &self,
        id: &str,
        current_price: Option<f64>,
        checked_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.record_price(id, current_price, checked_at)?;
        self.persist(&state)
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn create(&self, user: UserAccount) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.insert_user(user);
        self.persist(&state)
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
