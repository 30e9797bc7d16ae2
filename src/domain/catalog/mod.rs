//! Catalog domain - external product catalog contract

mod catalog_interface;

pub use catalog_interface::ProductCatalog;

use serde::{Deserialize, Serialize};

/// Product data as returned by the retailer catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub sku: String,
    pub title: String,
    pub sale_price: Option<f64>,
    pub regular_price: Option<f64>,
    pub url: Option<String>,
}

impl ProductInfo {
    /// Current price resolution rule, shared by every caller: prefer the sale
    /// price, fall back to the regular price, otherwise unknown.
    pub fn current_price(&self) -> Option<f64> {
        self.sale_price.or(self.regular_price)
    }

    /// Display title fallback for catalog entries without a name
    pub fn fallback_title(sku: &str) -> String {
        format!("SKU {}", sku)
    }
}
