//! API configuration.

use std::time::Duration;

use ttk_ai::AiConfig;
use ttk_transcript::TranscriptConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Per-client burst limit (requests per second)
    pub rate_limit_rps: u32,
    /// Per-client burst allowance
    pub rate_limit_burst: u32,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Redis URL; in-process stores are used when unset
    pub redis_url: Option<String>,
    /// HS256 secret for session tokens
    pub auth_jwt_secret: Option<String>,
    /// How long a user's project listing is served from cache
    pub listing_cache_ttl: Duration,
    /// Transcript providers
    pub transcript: TranscriptConfig,
    /// Script generation
    pub ai: AiConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            rate_limit_burst: 20,
            request_timeout: Duration::from_secs(120),
            max_body_size: 64 * 1024, // 64KB
            environment: "development".to_string(),
            redis_url: None,
            auth_jwt_secret: None,
            listing_cache_ttl: Duration::from_secs(60),
            transcript: TranscriptConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            rate_limit_burst: std::env::var("RATE_LIMIT_BURST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64 * 1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            redis_url: std::env::var("REDIS_URL").ok().filter(|s| !s.trim().is_empty()),
            auth_jwt_secret: std::env::var("AUTH_JWT_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            listing_cache_ttl: Duration::from_secs(
                std::env::var("LISTING_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            transcript: TranscriptConfig::from_env(),
            ai: AiConfig::from_env(),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
