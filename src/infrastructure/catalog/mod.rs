//! Retailer catalog API client

mod retail_api_client;

pub use retail_api_client::RetailCatalogClient;
