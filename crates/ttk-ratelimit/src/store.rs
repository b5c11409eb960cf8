//! Counter store trait.

use std::sync::Arc;

use async_trait::async_trait;

use ttk_models::{RateLimitDecision, RateLimitPolicy};

use crate::error::RateLimitResult;
use crate::memory::InMemorySlidingWindow;
use crate::redis_store::RedisSlidingWindow;

/// Increment-and-check counter for one policy.
///
/// Denied attempts are not counted.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Record one operation for `key` and report whether it is allowed.
    async fn limit(&self, key: &str) -> RateLimitResult<RateLimitDecision>;

    fn policy(&self) -> &RateLimitPolicy;
}

/// Redis-backed store when a client is given, in-process otherwise.
pub fn build_store(
    policy: RateLimitPolicy,
    redis: Option<&redis::Client>,
) -> Arc<dyn RateLimitStore> {
    match redis {
        Some(client) => Arc::new(RedisSlidingWindow::new(client.clone(), policy)),
        None => Arc::new(InMemorySlidingWindow::new(policy)),
    }
}

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
