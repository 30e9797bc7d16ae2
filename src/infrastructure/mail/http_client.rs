//! HTTP mail API client

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use super::traits::{MailEnvelope, MailTransport};
use crate::shared::config::MailCfg;
use crate::shared::errors::MailError;

/// Posts envelopes as JSON to a transactional-mail HTTP endpoint with a
/// bearer token.
#[derive(Debug)]
pub struct HttpMailClient {
    http_client: Client,
    endpoint: String,
    token: String,
}

impl HttpMailClient {
    pub fn new(cfg: &MailCfg) -> Result<Self, MailError> {
        if cfg.endpoint.trim().is_empty() || cfg.token.trim().is_empty() {
            return Err(MailError::MissingCredentials);
        }

        Ok(Self {
            http_client: Client::new(),
            endpoint: cfg.endpoint.clone(),
            token: cfg.token.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for HttpMailClient {
    async fn send(&self, envelope: &MailEnvelope) -> Result<(), MailError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(envelope)
            .send()
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Delivery(format!(
                "mail API returned status {}",
                response.status()
            )));
        }

        info!("Sent mail to {}: {}", envelope.to, envelope.subject);
        Ok(())
    }
}
