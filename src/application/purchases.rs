//! Purchase registration and maintenance

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::catalog::ProductCatalog;
use crate::domain::watch::PurchaseView;
use crate::infrastructure::store::PurchaseStore;
use crate::shared::errors::{AppError, StoreError, ValidationError};
use crate::shared::types::PurchaseRecord;

/// Caller input for registering a purchase. `title` and `paid_price` may be
/// left out to be pre-filled from a catalog lookup.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub user_id: String,
    pub sku: String,
    pub title: Option<String>,
    pub paid_price: Option<f64>,
    pub purchase_date: DateTime<Utc>,
    pub watched: bool,
}

/// Partial edit of the user-editable fields
#[derive(Debug, Clone, Default)]
pub struct PurchaseEdit {
    pub sku: Option<String>,
    pub title: Option<String>,
    pub paid_price: Option<f64>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub watched: Option<bool>,
}

/// Create/edit/delete over purchase records with validation up front.
/// Validation failures surface before anything is persisted.
pub struct PurchaseService {
    store: Arc<dyn PurchaseStore>,
    catalog: Arc<dyn ProductCatalog>,
}

impl PurchaseService {
    pub fn new(store: Arc<dyn PurchaseStore>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { store, catalog }
    }

    pub async fn register(
        &self,
        new: NewPurchase,
        now: DateTime<Utc>,
    ) -> Result<PurchaseView, AppError> {
        let sku = new.sku.trim().to_string();
        if sku.is_empty() {
            return Err(ValidationError::EmptySku.into());
        }

        let mut title = new.title.filter(|t| !t.trim().is_empty());
        let mut paid_price = new.paid_price;

        // catalog pre-fill for whatever the caller left out; best effort when
        // the paid price was supplied, required otherwise
        if title.is_none() || paid_price.is_none() {
            match self.catalog.fetch_by_sku(&sku).await {
                Ok(Some(info)) => {
                    if title.is_none() {
                        title = Some(info.title.clone());
                    }
                    if paid_price.is_none() {
                        paid_price = info.current_price();
                    }
                }
                Ok(None) => {
                    warn!("No catalog product for SKU {} during registration", sku);
                }
                Err(e) if paid_price.is_some() => {
                    warn!("Catalog pre-fill failed for SKU {}: {}", sku, e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let paid_price =
            paid_price.ok_or(AppError::Validation(ValidationError::MissingField("paid_price")))?;
        validate_price(paid_price)?;

        let record = PurchaseRecord::new(
            new.user_id,
            sku,
            title,
            paid_price,
            new.purchase_date,
            new.watched,
        );
        self.store.create(record.clone()).await?;

        Ok(PurchaseView::from_record(&record, now))
    }

    pub async fn update(
        &self,
        id: &str,
        edit: PurchaseEdit,
        now: DateTime<Utc>,
    ) -> Result<PurchaseView, AppError> {
        if let Some(sku) = &edit.sku {
            if sku.trim().is_empty() {
                return Err(ValidationError::EmptySku.into());
            }
        }
        if let Some(price) = edit.paid_price {
            validate_price(price)?;
        }

        let mut record = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;

        if let Some(sku) = edit.sku {
            record.sku = sku.trim().to_string();
        }
        if let Some(title) = edit.title {
            record.title = Some(title);
        }
        if let Some(price) = edit.paid_price {
            record.paid_price = price;
        }
        if let Some(date) = edit.purchase_date {
            record.purchase_date = date;
        }
        if let Some(watched) = edit.watched {
            record.watched = watched;
        }

        self.store.update(record.clone()).await?;
        Ok(PurchaseView::from_record(&record, now))
    }

    /// Deletion is immediate and irreversible - there is no soft delete
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.store.delete(id).await?;
        Ok(())
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<PurchaseView>, AppError> {
        let records = self.store.list_for_user(user_id).await?;
        Ok(records
            .iter()
            .map(|r| PurchaseView::from_record(r, now))
            .collect())
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidPrice);
    }
    if price < 0.0 {
        return Err(ValidationError::NegativePrice(price));
    }
    Ok(())
}
