//! Spacing between consecutive provider requests.

use async_trait::async_trait;
use std::time::Duration;

/// Default gap between search requests.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_secs(1);

/// Called before every request except the first of a stage run.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn pause(&self);
}

/// Sleep for a fixed duration. No backoff, no adaptation.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(DEFAULT_SEARCH_DELAY)
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn pause(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Throttle for NoDelay {
    async fn pause(&self) {}
}
