//! Scheduled batch driver - one pass over every qualifying user
//!
//! Meant to be invoked by an external scheduler (cron). A run never aborts on
//! one user's failure; failures are isolated per-user and per-record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::domain::check::{CheckReport, PriceCheckEngine};
use crate::domain::notify::{DropInfo, NotificationComposer};
use crate::domain::watch::{coarse_cutoff, days_left};
use crate::infrastructure::mail::{MailEnvelope, MailTransport};
use crate::infrastructure::store::{PurchaseStore, UserStore};

/// Counters for one batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub users_checked: u64,
    pub users_skipped_no_email: u64,
    pub records_checked: u64,
    pub drops_found: u64,
    pub emails_sent: u64,
    pub failures: u64,
}

impl BatchStats {
    fn log_summary(&self) {
        info!("📊 Batch run summary:");
        info!("   Users checked: {}", self.users_checked);
        if self.users_skipped_no_email > 0 {
            info!("   Users skipped (no email): {}", self.users_skipped_no_email);
        }
        info!("   Records checked: {}", self.records_checked);
        if self.drops_found > 0 {
            info!("   Drops found: {}", self.drops_found);
        }
        if self.emails_sent > 0 {
            info!("   Emails sent: {}", self.emails_sent);
        }
        if self.failures > 0 {
            info!("   Failures: {}", self.failures);
        }
    }
}

/// The scheduled price-check-and-email driver
pub struct WatchBatch {
    engine: PriceCheckEngine,
    users: Arc<dyn UserStore>,
    purchases: Arc<dyn PurchaseStore>,
    composer: NotificationComposer,
    mail: Arc<dyn MailTransport>,
    mail_from: String,
}

impl WatchBatch {
    pub fn new(
        engine: PriceCheckEngine,
        users: Arc<dyn UserStore>,
        purchases: Arc<dyn PurchaseStore>,
        mail: Arc<dyn MailTransport>,
        mail_from: String,
    ) -> Self {
        Self {
            engine,
            users,
            purchases,
            composer: NotificationComposer::new(),
            mail,
            mail_from,
        }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> BatchStats {
        info!("🚀 Running scheduled price check at {}", now.to_rfc3339());
        let mut stats = BatchStats::default();

        let users = match self.users.users_with_watched_since(coarse_cutoff(now)).await {
            Ok(users) => users,
            Err(e) => {
                error!("Failed to enumerate qualifying users: {}", e);
                stats.failures += 1;
                return stats;
            }
        };

        if users.is_empty() {
            info!("No users with active watched purchases. Nothing to do.");
            return stats;
        }

        for user in users {
            let Some(email) = user.email.as_deref().filter(|e| !e.trim().is_empty()) else {
                warn!("Skipping user {} without an email address", user.id);
                stats.users_skipped_no_email += 1;
                continue;
            };

            info!("Checking prices for user {}", user.id);
            let report = match self.engine.run_for_user(&user.id, now).await {
                Ok(report) => report,
                Err(e) => {
                    error!("Price check failed for user {}: {}", user.id, e);
                    stats.failures += 1;
                    continue;
                }
            };

            stats.users_checked += 1;
            stats.records_checked += report.results.len() as u64;

            let drops = self.collect_drops(&report, now).await;
            stats.drops_found += drops.len() as u64;

            if drops.is_empty() {
                info!("No price drops for user {}", user.id);
                continue;
            }

            info!("User {} has {} item(s) with price drops", user.id, drops.len());
            let message = self.composer.compose(&drops, report.checked_at);
            let envelope = MailEnvelope {
                from: self.mail_from.clone(),
                to: email.to_string(),
                subject: message.subject,
                text: message.text,
                html: message.html,
            };

            match self.mail.send(&envelope).await {
                Ok(()) => stats.emails_sent += 1,
                Err(e) => {
                    // the price-check state is already persisted and stays that way
                    error!("Mail delivery failed for user {}: {}", user.id, e);
                    stats.failures += 1;
                }
            }
        }

        stats.log_summary();
        stats
    }

    /// Keep only actual drops and attach the days remaining in each record's
    /// window, computed from `purchase_date` at detection time.
    async fn collect_drops(&self, report: &CheckReport, now: DateTime<Utc>) -> Vec<DropInfo> {
        let mut drops = Vec::new();

        for result in report.results.iter().filter(|r| r.price_drop > 0.0) {
            let Some(current_price) = result.current_price else {
                continue;
            };

            match self.purchases.get(&result.id).await {
                Ok(Some(record)) => drops.push(DropInfo {
                    id: result.id.clone(),
                    sku: result.sku.clone(),
                    title: result.title.clone(),
                    paid_price: result.paid_price,
                    current_price,
                    price_drop: result.price_drop,
                    days_left: days_left(&record, now),
                }),
                Ok(None) => warn!("Record {} disappeared during the run", result.id),
                Err(e) => {
                    warn!("Could not reload record {}: {}", result.id, e);
                }
            }
        }

        drops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    use crate::domain::catalog::{ProductCatalog, ProductInfo};
    use crate::domain::check::NoopPacer;
    use crate::infrastructure::store::MemoryStore;
    use crate::shared::errors::{CatalogError, MailError};
    use crate::shared::types::{PurchaseRecord, UserAccount};

    struct FakeCatalog {
        prices: HashMap<String, f64>,
        calls: Mutex<usize>,
    }

    impl FakeCatalog {
        fn new(prices: Vec<(&str, f64)>) -> Self {
            Self {
                prices: prices
                    .into_iter()
                    .map(|(sku, p)| (sku.to_string(), p))
                    .collect(),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ProductCatalog for FakeCatalog {
        async fn fetch_by_sku(&self, sku: &str) -> Result<Option<ProductInfo>, CatalogError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.prices.get(sku).map(|price| ProductInfo {
                sku: sku.to_string(),
                title: format!("Product {}", sku),
                sale_price: Some(*price),
                regular_price: None,
                url: None,
            }))
        }
    }

    /// Mail transport that records envelopes and can fail per recipient
    struct FakeMailTransport {
        sent: Mutex<Vec<MailEnvelope>>,
        fail_for: Option<String>,
    }

    impl FakeMailTransport {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: None,
            }
        }

        fn failing_for(recipient: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: Some(recipient.to_string()),
            }
        }

        fn sent(&self) -> Vec<MailEnvelope> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailTransport for FakeMailTransport {
        async fn send(&self, envelope: &MailEnvelope) -> Result<(), MailError> {
            if self.fail_for.as_deref() == Some(envelope.to.as_str()) {
                return Err(MailError::Delivery("simulated bounce".to_string()));
            }
            self.sent.lock().unwrap().push(envelope.clone());
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    async fn seed_user(
        store: &MemoryStore,
        user_id: &str,
        email: Option<&str>,
        purchases: Vec<(&str, f64, i64)>,
    ) -> Vec<PurchaseRecord> {
        UserStore::create(store, UserAccount::new(user_id, email.map(str::to_string)))
            .await
            .unwrap();
        let mut records = Vec::new();
        for (sku, paid, days_ago) in purchases {
            let record = PurchaseRecord::new(
                user_id,
                sku,
                None,
                paid,
                now() - Duration::days(days_ago),
                true,
            );
            PurchaseStore::create(store, record.clone()).await.unwrap();
            records.push(record);
        }
        records
    }

    fn batch(
        store: Arc<MemoryStore>,
        catalog: Arc<FakeCatalog>,
        mail: Arc<FakeMailTransport>,
    ) -> WatchBatch {
        let engine = PriceCheckEngine::new(catalog, store.clone(), Arc::new(NoopPacer));
        WatchBatch::new(
            engine,
            store.clone(),
            store,
            mail,
            "watch@example.com".to_string(),
        )
    }

    #[tokio::test]
    async fn test_drops_produce_one_email_per_user() {
        let store = Arc::new(MemoryStore::new());
        seed_user(
            &store,
            "u1",
            Some("u1@example.com"),
            vec![("1000001", 100.0, 5), ("1000002", 60.0, 10)],
        )
        .await;

        let catalog = Arc::new(FakeCatalog::new(vec![
            ("1000001", 80.0),
            ("1000002", 60.0), // unchanged, no drop
        ]));
        let mail = Arc::new(FakeMailTransport::new());
        let stats = batch(store, catalog, mail.clone()).run(now()).await;

        assert_eq!(stats.users_checked, 1);
        assert_eq!(stats.records_checked, 2);
        assert_eq!(stats.drops_found, 1);
        assert_eq!(stats.emails_sent, 1);

        let sent = mail.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "u1@example.com");
        assert!(sent[0].subject.contains("1 item dropped"));
        assert!(sent[0].text.contains("Product 1000001"));
    }

    #[tokio::test]
    async fn test_no_drops_suppresses_notification() {
        let store = Arc::new(MemoryStore::new());
        seed_user(
            &store,
            "u1",
            Some("u1@example.com"),
            vec![("1000001", 50.0, 5)],
        )
        .await;

        // current price equals paid price - checked, but no drop
        let catalog = Arc::new(FakeCatalog::new(vec![("1000001", 50.0)]));
        let mail = Arc::new(FakeMailTransport::new());
        let stats = batch(store, catalog, mail.clone()).run(now()).await;

        assert_eq!(stats.records_checked, 1);
        assert_eq!(stats.drops_found, 0);
        assert_eq!(stats.emails_sent, 0);
        assert!(mail.sent().is_empty());
    }

    #[tokio::test]
    async fn test_user_without_email_is_skipped_before_any_lookup() {
        let store = Arc::new(MemoryStore::new());
        seed_user(&store, "u1", None, vec![("1000001", 100.0, 5)]).await;

        let catalog = Arc::new(FakeCatalog::new(vec![("1000001", 10.0)]));
        let mail = Arc::new(FakeMailTransport::new());
        let stats = batch(store, catalog.clone(), mail.clone()).run(now()).await;

        assert_eq!(stats.users_skipped_no_email, 1);
        assert_eq!(stats.users_checked, 0);
        assert_eq!(catalog.call_count(), 0);
        assert!(mail.sent().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_block_other_users() {
        let store = Arc::new(MemoryStore::new());
        seed_user(
            &store,
            "u1",
            Some("bounce@example.com"),
            vec![("1000001", 100.0, 5)],
        )
        .await;
        seed_user(
            &store,
            "u2",
            Some("ok@example.com"),
            vec![("1000002", 100.0, 5)],
        )
        .await;

        let catalog = Arc::new(FakeCatalog::new(vec![
            ("1000001", 80.0),
            ("1000002", 70.0),
        ]));
        let mail = Arc::new(FakeMailTransport::failing_for("bounce@example.com"));
        let stats = batch(store.clone(), catalog, mail.clone()).run(now()).await;

        assert_eq!(stats.users_checked, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.emails_sent, 1);
        assert_eq!(mail.sent()[0].to, "ok@example.com");

        // the failed delivery did not roll back persisted check state
        let records = store.list_for_user("u1").await.unwrap();
        assert_eq!(records[0].last_price, Some(80.0));
        assert_eq!(records[0].last_checked, Some(now()));
    }

    #[tokio::test]
    async fn test_days_left_comes_from_purchase_date() {
        let store = Arc::new(MemoryStore::new());
        seed_user(
            &store,
            "u1",
            Some("u1@example.com"),
            vec![("1000001", 100.0, 18)],
        )
        .await;

        let catalog = Arc::new(FakeCatalog::new(vec![("1000001", 80.0)]));
        let mail = Arc::new(FakeMailTransport::new());
        batch(store, catalog, mail.clone()).run(now()).await;

        let sent = mail.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("12 days left to claim"));
    }
}
