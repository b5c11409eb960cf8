//! Redis sliding window.

use async_trait::async_trait;
use redis::Script;
use tracing::debug;

use ttk_models::{RateLimitDecision, RateLimitPolicy};

use crate::error::{RateLimitError, RateLimitResult};
use crate::store::{now_ms, RateLimitStore};

/// Trim, count, conditionally add and report in one round trip.
///
/// KEYS[1] = counter key; ARGV = now_ms, window_ms, limit, member.
/// Returns {allowed, count, reset_at_ms}.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local limit = tonumber(ARGV[3])

redis.call('ZREMRANGEBYSCORE', key, '-inf', now - window)
local count = redis.call('ZCARD', key)
local allowed = 0
if count < limit then
    redis.call('ZADD', key, now, ARGV[4])
    count = count + 1
    allowed = 1
end
redis.call('PEXPIRE', key, window)

local reset = now + window
local oldest = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
if oldest[2] then
    reset = tonumber(oldest[2]) + window
end
return {allowed, count, reset}
"#;

/// Sliding window stored as a sorted set of operation timestamps.
pub struct RedisSlidingWindow {
    client: redis::Client,
    policy: RateLimitPolicy,
    script: Script,
}

impl RedisSlidingWindow {
    pub fn new(client: redis::Client, policy: RateLimitPolicy) -> Self {
        Self {
            client,
            policy,
            script: Script::new(SLIDING_WINDOW_SCRIPT),
        }
    }

    pub fn from_url(redis_url: &str, policy: RateLimitPolicy) -> RateLimitResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self::new(client, policy))
    }
}

#[async_trait]
impl RateLimitStore for RedisSlidingWindow {
    async fn limit(&self, key: &str) -> RateLimitResult<RateLimitDecision> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RateLimitError::connection_failed(e.to_string()))?;

        let now = now_ms();
        let storage_key = self.policy.storage_key(key);
        let member = format!("{}-{}", now, uuid::Uuid::new_v4().simple());

        let (allowed, count, reset_at_ms): (i64, i64, i64) = self
            .script
            .key(&storage_key)
            .arg(now)
            .arg(self.policy.window_ms())
            .arg(self.policy.max_requests)
            .arg(member)
            .invoke_async(&mut conn)
            .await?;

        debug!(
            policy = self.policy.name,
            allowed = allowed == 1,
            count,
            "Rate limit check"
        );

        let limit = self.policy.max_requests;
        Ok(RateLimitDecision {
            allowed: allowed == 1,
            limit,
            remaining: limit.saturating_sub(u32::try_from(count).unwrap_or(u32::MAX)),
            reset_at_ms,
        })
    }

    fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }
}
