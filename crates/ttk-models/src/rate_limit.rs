//! Rate-limit policies and decisions.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named quota applied to one class of callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Policy name used in logs and metrics
    pub name: &'static str,
    /// Key prefix in the counter store
    pub prefix: String,
    /// Operations allowed per window
    pub max_requests: u32,
    /// Rolling window length
    pub window: Duration,
}

impl RateLimitPolicy {
    /// Signed-in users: 10 operations per rolling hour.
    pub fn authenticated() -> Self {
        Self {
            name: "authenticated",
            prefix: "tubetotiktok-ratelimit".to_string(),
            max_requests: 10,
            window: Duration::from_secs(60 * 60),
        }
    }

    /// Anonymous try-for-free: 1 operation per rolling 24 hours.
    pub fn anonymous() -> Self {
        Self {
            name: "anonymous",
            prefix: "tubetotiktok-free-ratelimit".to_string(),
            max_requests: 1,
            window: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Routing-layer gate: the signed-in quota applied to every caller in its
    /// own namespace. Coarser than the anonymous quota so a rejected request
    /// never spends a free generation.
    pub fn gate() -> Self {
        Self {
            name: "gate",
            ..Self::authenticated().namespaced("gate")
        }
    }

    /// Same quota under a separate counter namespace.
    pub fn namespaced(mut self, namespace: &str) -> Self {
        self.prefix = format!("{}:{}", self.prefix, namespace);
        self
    }

    /// Full counter key for a caller.
    pub fn storage_key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Outcome of one increment-and-check against the counter store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// When the oldest counted operation leaves the window (epoch ms)
    pub reset_at_ms: i64,
}

impl RateLimitDecision {
    pub fn reset_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.reset_at_ms)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Whole seconds until reset, never below one.
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let delta_ms = (self.reset_at_ms - now_ms).max(0) as u64;
        delta_ms.div_ceil(1000).max(1)
    }
}
