//! Access policy: who is calling and whether they still have quota.

use std::sync::Arc;

use tracing::warn;

use ttk_models::{Identity, PolicyKind, RateLimitDecision, RateLimitPolicy};
use ttk_ratelimit::{build_store, RateLimitStore};

use crate::auth::AuthUser;
use crate::client::ClientContext;
use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// One counter store per policy kind.
#[derive(Clone)]
pub struct AccessPolicy {
    authenticated: Arc<dyn RateLimitStore>,
    anonymous: Arc<dyn RateLimitStore>,
}

impl AccessPolicy {
    pub fn new(authenticated: Arc<dyn RateLimitStore>, anonymous: Arc<dyn RateLimitStore>) -> Self {
        Self {
            authenticated,
            anonymous,
        }
    }

    /// Default service quotas.
    pub fn with_defaults(redis: Option<&redis::Client>) -> Self {
        Self::new(
            build_store(RateLimitPolicy::authenticated(), redis),
            build_store(RateLimitPolicy::anonymous(), redis),
        )
    }

    /// Routing-layer gate: one coarse counter shared by every caller kind.
    pub fn gate(redis: Option<&redis::Client>) -> Self {
        let store = build_store(RateLimitPolicy::gate(), redis);
        Self::new(store.clone(), store)
    }

    /// Signed-in identity, or `Unauthorized`.
    pub fn authorize_user(user: Option<&AuthUser>) -> ApiResult<Identity> {
        user.filter(|u| !u.uid.is_empty())
            .map(|u| Identity::user(&u.uid))
            .ok_or(ApiError::Unauthorized)
    }

    /// Anonymous identity, or `MissingFingerprint`.
    pub fn authorize_anonymous(client: &ClientContext) -> ApiResult<Identity> {
        Identity::anonymous(client.fingerprint.as_deref(), client.ip.as_deref())
            .ok_or(ApiError::MissingFingerprint)
    }

    /// Count one operation; fails `RateLimited` when over quota.
    pub async fn check_rate_limit(&self, identity: &Identity) -> ApiResult<RateLimitDecision> {
        let decision = self.decide(identity).await?;
        if !decision.allowed {
            let policy = self.store_for(identity).policy();
            warn!(policy = policy.name, "Rate limit exceeded");
            metrics::record_rate_limit_hit(policy.name);
            return Err(ApiError::RateLimited(decision));
        }
        Ok(decision)
    }

    /// Count one operation and return the raw decision.
    pub async fn decide(&self, identity: &Identity) -> ApiResult<RateLimitDecision> {
        let store = self.store_for(identity);
        Ok(store.limit(&identity.rate_limit_key()).await?)
    }

    fn store_for(&self, identity: &Identity) -> &Arc<dyn RateLimitStore> {
        match identity.policy_kind() {
            PolicyKind::Authenticated => &self.authenticated,
            PolicyKind::Anonymous => &self.anonymous,
        }
    }
}
