//! Application state.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use ttk_ai::ScriptGenerator;
use ttk_store::{InMemoryProjectRepository, ProjectRepository, RedisProjectRepository};
use ttk_transcript::TranscriptService;

use crate::auth::{AnonymousOnly, IdentityProvider, JwtIdentityProvider};
use crate::config::ApiConfig;
use crate::services::{AccessPolicy, ListingCache, ProjectService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub identity: Arc<dyn IdentityProvider>,
    pub projects: ProjectService,
    pub gate: AccessPolicy,
    pub redis: Option<redis::Client>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let redis = config
            .redis_url
            .as_deref()
            .map(redis::Client::open)
            .transpose()
            .context("Invalid REDIS_URL")?;

        if redis.is_none() {
            warn!("REDIS_URL not set; rate limits and projects are kept in memory");
        }

        let identity: Arc<dyn IdentityProvider> = match &config.auth_jwt_secret {
            Some(secret) => Arc::new(JwtIdentityProvider::new(secret)),
            None => {
                warn!("AUTH_JWT_SECRET not set; authenticated routes will reject every request");
                Arc::new(AnonymousOnly)
            }
        };

        let repository: Arc<dyn ProjectRepository> = match &redis {
            Some(client) => Arc::new(RedisProjectRepository::new(client.clone())),
            None => Arc::new(InMemoryProjectRepository::new()),
        };

        let projects = ProjectService::new(
            AccessPolicy::with_defaults(redis.as_ref()),
            TranscriptService::from_config(&config.transcript)?,
            ScriptGenerator::from_config(&config.ai)?,
            repository,
            ListingCache::with_ttl(config.listing_cache_ttl),
        );
        let gate = AccessPolicy::gate(redis.as_ref());

        info!(
            model = %config.ai.model,
            fallback_configured = config.transcript.supadata_api_key.is_some(),
            "Application state ready"
        );

        Ok(Self::from_parts(config, identity, projects, gate, redis))
    }

    /// Assemble state from prebuilt collaborators.
    pub fn from_parts(
        config: ApiConfig,
        identity: Arc<dyn IdentityProvider>,
        projects: ProjectService,
        gate: AccessPolicy,
        redis: Option<redis::Client>,
    ) -> Self {
        Self {
            config,
            identity,
            projects,
            gate,
            redis,
        }
    }
}
