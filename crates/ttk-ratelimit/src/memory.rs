//! In-process sliding window.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use ttk_models::{RateLimitDecision, RateLimitPolicy};

use crate::error::RateLimitResult;
use crate::store::{now_ms, RateLimitStore};

/// Tracked keys before idle ones are swept.
const MAX_TRACKED_KEYS: usize = 10_000;

/// Per-key timestamps of counted operations, oldest first.
pub struct InMemorySlidingWindow {
    policy: RateLimitPolicy,
    hits: Mutex<HashMap<String, VecDeque<i64>>>,
}

impl InMemorySlidingWindow {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            hits: Mutex::new(HashMap::new()),
        }
    }

    async fn limit_at(&self, key: &str, now: i64) -> RateLimitDecision {
        let window = self.policy.window_ms();
        let limit = self.policy.max_requests;
        let storage_key = self.policy.storage_key(key);

        let mut hits = self.hits.lock().await;
        if hits.len() >= MAX_TRACKED_KEYS && !hits.contains_key(&storage_key) {
            sweep_idle(&mut hits, now - window);
        }

        let entries = hits.entry(storage_key.clone()).or_default();
        while entries.front().is_some_and(|&t| t <= now - window) {
            entries.pop_front();
        }

        let allowed = (entries.len() as u32) < limit;
        if allowed {
            entries.push_back(now);
        }

        let count = entries.len() as u32;
        let reset_at_ms = entries.front().map(|&t| t + window).unwrap_or(now + window);
        if entries.is_empty() {
            hits.remove(&storage_key);
        }

        RateLimitDecision {
            allowed,
            limit,
            remaining: limit.saturating_sub(count),
            reset_at_ms,
        }
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.hits.lock().await.len()
    }
}

/// Drop keys whose every hit has left the window.
fn sweep_idle(hits: &mut HashMap<String, VecDeque<i64>>, cutoff: i64) {
    let before = hits.len();
    hits.retain(|_, entries| entries.back().is_some_and(|&t| t > cutoff));
    debug!(removed = before - hits.len(), "Swept idle rate-limit keys");
}

#[async_trait]
impl RateLimitStore for InMemorySlidingWindow {
    async fn limit(&self, key: &str) -> RateLimitResult<RateLimitDecision> {
        Ok(self.limit_at(key, now_ms()).await)
    }

    fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy(max_requests: u32, window: Duration) -> RateLimitPolicy {
        RateLimitPolicy {
            name: "test",
            prefix: "test".to_string(),
            max_requests,
            window,
        }
    }

    #[tokio::test]
    async fn test_allows_up_to_limit() {
        let store = InMemorySlidingWindow::new(policy(3, Duration::from_secs(60)));

        for expected_remaining in [2, 1, 0] {
            let decision = store.limit("user").await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
            assert_eq!(decision.limit, 3);
        }

        let decision = store.limit("user").await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemorySlidingWindow::new(policy(1, Duration::from_secs(60)));
        assert!(store.limit("a").await.unwrap().allowed);
        assert!(!store.limit("a").await.unwrap().allowed);
        assert!(store.limit("b").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn test_window_slides() {
        let store = InMemorySlidingWindow::new(policy(2, Duration::from_millis(1_000)));

        assert!(store.limit_at("k", 0).await.allowed);
        assert!(store.limit_at("k", 400).await.allowed);

        let denied = store.limit_at("k", 900).await;
        assert!(!denied.allowed);
        assert_eq!(denied.reset_at_ms, 1_000);

        // First hit leaves the window; one slot frees up.
        let allowed = store.limit_at("k", 1_000).await;
        assert!(allowed.allowed);
        assert_eq!(allowed.remaining, 0);
        assert_eq!(allowed.reset_at_ms, 1_400);
    }

    #[tokio::test]
    async fn test_denied_attempts_not_counted() {
        let store = InMemorySlidingWindow::new(policy(1, Duration::from_millis(1_000)));
        assert!(store.limit_at("k", 0).await.allowed);
        for t in [100, 200, 300] {
            assert!(!store.limit_at("k", t).await.allowed);
        }
        assert!(store.limit_at("k", 1_000).await.allowed);
    }

    #[tokio::test]
    async fn test_zero_quota_tracks_nothing() {
        let store = InMemorySlidingWindow::new(policy(0, Duration::from_secs(60)));
        assert!(!store.limit("k").await.unwrap().allowed);
        assert_eq!(store.tracked_keys().await, 0);
    }

    #[tokio::test]
    async fn test_idle_keys_are_swept_at_capacity() {
        let store = InMemorySlidingWindow::new(policy(1, Duration::from_millis(1_000)));
        for i in 0..MAX_TRACKED_KEYS {
            store.limit_at(&format!("caller-{}", i), 0).await;
        }
        assert_eq!(store.tracked_keys().await, MAX_TRACKED_KEYS);

        // Every earlier hit has left the window by now
        let decision = store.limit_at("newcomer", 5_000).await;
        assert!(decision.allowed);
        assert_eq!(store.tracked_keys().await, 1);
    }

    #[tokio::test]
    async fn test_active_keys_survive_sweep() {
        let store = InMemorySlidingWindow::new(policy(1, Duration::from_millis(1_000)));
        for i in 0..MAX_TRACKED_KEYS {
            store.limit_at(&format!("caller-{}", i), 0).await;
        }

        let decision = store.limit_at("newcomer", 500).await;
        assert!(decision.allowed);
        assert_eq!(store.tracked_keys().await, MAX_TRACKED_KEYS + 1);
        assert!(!store.limit_at("caller-0", 600).await.allowed);
    }
}
