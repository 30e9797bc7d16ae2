//! Price check engine - selects eligible records, fetches current prices and
//! persists check state

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{CallPacer, CheckReport, PriceCheckResult};
use crate::domain::catalog::ProductCatalog;
use crate::domain::watch::{coarse_cutoff, is_eligible};
use crate::infrastructure::store::PurchaseStore;
use crate::shared::errors::CheckError;
use crate::shared::types::PurchaseRecord;

/// Runs the watch-window price check for one user. Catalog calls are made
/// strictly one at a time behind the pacer; a failing SKU is recorded as
/// "no data" and never aborts the rest of the batch.
pub struct PriceCheckEngine {
    catalog: Arc<dyn ProductCatalog>,
    store: Arc<dyn PurchaseStore>,
    pacer: Arc<dyn CallPacer>,
}

impl PriceCheckEngine {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        store: Arc<dyn PurchaseStore>,
        pacer: Arc<dyn CallPacer>,
    ) -> Self {
        Self {
            catalog,
            store,
            pacer,
        }
    }

    pub async fn run_for_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CheckReport, CheckError> {
        let candidates = self.store.watched_since(user_id, coarse_cutoff(now)).await?;
        // the coarse store query is only an approximation; the exact window
        // check decides
        let candidates: Vec<PurchaseRecord> = candidates
            .into_iter()
            .filter(|r| is_eligible(r, now))
            .collect();

        if candidates.is_empty() {
            info!("No watched purchases in window for user {}", user_id);
            return Ok(CheckReport {
                checked_at: now,
                results: Vec::new(),
            });
        }

        let mut results = Vec::with_capacity(candidates.len());

        for record in &candidates {
            self.pacer.pace().await;

            let result = match self.catalog.fetch_by_sku(&record.sku).await {
                Ok(Some(info)) => {
                    let current_price = info.current_price();
                    self.store
                        .record_price(&record.id, current_price, now)
                        .await?;
                    PriceCheckResult {
                        id: record.id.clone(),
                        sku: record.sku.clone(),
                        // the user's own title wins over the catalog name
                        title: Some(record.title.clone().unwrap_or(info.title)),
                        paid_price: record.paid_price,
                        current_price,
                        price_drop: price_drop(record.paid_price, current_price),
                    }
                }
                Ok(None) => {
                    self.store.mark_checked(&record.id, now).await?;
                    no_data_result(record)
                }
                Err(e) => {
                    warn!("Price check failed for SKU {}: {}", record.sku, e);
                    self.store.mark_checked(&record.id, now).await?;
                    no_data_result(record)
                }
            };

            results.push(result);
        }

        Ok(CheckReport {
            checked_at: now,
            results,
        })
    }
}

/// A drop is only reported when the current price is known and strictly below
/// the paid price; equal or higher prices yield zero, never a negative value.
fn price_drop(paid_price: f64, current_price: Option<f64>) -> f64 {
    match current_price {
        Some(current) if current < paid_price => paid_price - current,
        _ => 0.0,
    }
}

fn no_data_result(record: &PurchaseRecord) -> PriceCheckResult {
    PriceCheckResult {
        id: record.id.clone(),
        sku: record.sku.clone(),
        title: record.title.clone(),
        paid_price: record.paid_price,
        current_price: None,
        price_drop: 0.0,
    }
}
