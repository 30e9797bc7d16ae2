//! Product catalog interface trait

use async_trait::async_trait;

use super::ProductInfo;
use crate::shared::errors::CatalogError;

/// Common interface for retailer catalog lookups.
/// `Ok(None)` means the SKU does not exist upstream - a legitimate outcome,
/// distinct from a failed lookup. Implementations must not retry on their
/// own; the caller controls pacing.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn fetch_by_sku(&self, sku: &str) -> Result<Option<ProductInfo>, CatalogError>;
}
