//! Outbound mail transport

mod traits;
mod http_client;

pub use traits::{MailEnvelope, MailTransport};
pub use http_client::HttpMailClient;
