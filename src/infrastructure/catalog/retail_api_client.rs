//! Retail catalog API client over the products-by-SKU endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::catalog::{ProductCatalog, ProductInfo};
use crate::shared::config::CatalogCfg;
use crate::shared::errors::CatalogError;

/// HTTP client for the retailer product catalog. Fails closed when no API key
/// is configured; never retries on its own - the caller paces calls to stay
/// under the upstream rate limit.
#[derive(Debug)]
pub struct RetailCatalogClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl RetailCatalogClient {
    pub fn new(cfg: &CatalogCfg) -> Result<Self, CatalogError> {
        let api_key = cfg.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(CatalogError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

/// Map the raw catalog payload to [`ProductInfo`]. Prices that are absent or
/// not numeric come through as unknown rather than failing the lookup.
fn product_from_payload(sku: &str, payload: &Value) -> ProductInfo {
    let title = payload
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| ProductInfo::fallback_title(sku));

    ProductInfo {
        sku: sku.to_string(),
        title,
        sale_price: payload.get("salePrice").and_then(Value::as_f64),
        regular_price: payload.get("regularPrice").and_then(Value::as_f64),
        url: payload
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[async_trait]
impl ProductCatalog for RetailCatalogClient {
    async fn fetch_by_sku(&self, sku: &str) -> Result<Option<ProductInfo>, CatalogError> {
        let sku = sku.trim();
        let url = format!("{}/products/{}.json", self.base_url, sku);

        debug!("Fetching catalog product for SKU {}", sku);

        let response = self
            .http_client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            // Unknown SKU is a valid outcome, not a failure
            warn!("Catalog returned 404 for SKU {}", sku);
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(CatalogError::Upstream {
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        Ok(Some(product_from_payload(sku, &payload)))
    }
}
