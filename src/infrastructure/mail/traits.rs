//! Mail transport interface trait

use async_trait::async_trait;
use serde::Serialize;

use crate::shared::errors::MailError;

/// A fully composed outbound message
#[derive(Debug, Clone, Serialize)]
pub struct MailEnvelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Common interface for mail delivery. Delivery failure never rolls back
/// persistence that already happened during the check run.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, envelope: &MailEnvelope) -> Result<(), MailError>;
}
