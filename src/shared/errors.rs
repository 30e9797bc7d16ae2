//! Error handling for the application

use thiserror::Error;

/// Catalog API errors. A 404 from the catalog is not an error - lookups
/// return `Ok(None)` for unknown SKUs.
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("Catalog API key is not configured")]
    MissingApiKey,

    #[error("Catalog API error: {status}")]
    Upstream { status: u16 },

    #[error("Catalog request failed: {0}")]
    Network(String),

    #[error("Malformed catalog response: {0}")]
    Decode(String),
}

/// Persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Purchase not found: {0}")]
    RecordNotFound(String),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Mail transport errors
#[derive(Error, Debug, Clone)]
pub enum MailError {
    #[error("Mail credentials are not configured")]
    MissingCredentials,

    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Malformed caller input, raised before any persistence
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("SKU must not be empty")]
    EmptySku,

    #[error("Paid price must not be negative: {0}")]
    NegativePrice(f64),

    #[error("Paid price is not a valid number")]
    InvalidPrice,
}

/// Check engine errors. Catalog failures are absorbed per-record inside the
/// engine; only persistence failures escape it.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Store error during price check: {0}")]
    Store(#[from] StoreError),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Price check error: {0}")]
    Check(#[from] CheckError),
}
