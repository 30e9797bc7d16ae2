//! Call pacing between catalog lookups
//!
//! The upstream catalog starts denying access when it is called in rapid
//! succession, so calls within a run are serialized behind a pacer. The
//! production pacer sleeps a fixed interval before every call; tests inject
//! the no-op pacer to run without wall-clock delay.

use std::time::Duration;

use async_trait::async_trait;

/// Gate awaited before every outbound catalog call
#[async_trait]
pub trait CallPacer: Send + Sync {
    async fn pace(&self);
}

/// Fixed inter-call delay (production default 750 ms)
pub struct FixedDelayPacer {
    interval: Duration,
}

impl FixedDelayPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

#[async_trait]
impl CallPacer for FixedDelayPacer {
    async fn pace(&self) {
        tokio::time::sleep(self.interval).await;
    }
}

/// Pacer that never waits
pub struct NoopPacer;

#[async_trait]
impl CallPacer for NoopPacer {
    async fn pace(&self) {}
}
