//! Transcript acquisition configuration.

use std::time::Duration;

/// Default YouTube origin (watch pages and oEmbed).
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// Default Supadata API origin.
pub const DEFAULT_SUPADATA_BASE_URL: &str = "https://api.supadata.ai";

/// Transcript acquisition configuration.
#[derive(Debug, Clone)]
pub struct TranscriptConfig {
    /// YouTube origin used for scraping and title lookup
    pub youtube_base_url: String,
    /// Supadata API origin
    pub supadata_base_url: String,
    /// Supadata API key (fallback tier is unavailable without it)
    pub supadata_api_key: Option<String>,
    /// Timeout applied to every outbound request
    pub timeout: Duration,
    /// How long a fetched transcript is reused for the same URL
    pub cache_ttl: Duration,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            youtube_base_url: DEFAULT_YOUTUBE_BASE_URL.to_string(),
            supadata_base_url: DEFAULT_SUPADATA_BASE_URL.to_string(),
            supadata_api_key: None,
            timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl TranscriptConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            youtube_base_url: std::env::var("YOUTUBE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_YOUTUBE_BASE_URL.to_string()),
            supadata_base_url: std::env::var("SUPADATA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SUPADATA_BASE_URL.to_string()),
            supadata_api_key: std::env::var("SUPADATA_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            timeout: Duration::from_secs(
                std::env::var("UPSTREAM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            cache_ttl: Duration::from_secs(
                std::env::var("TRANSCRIPT_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
        }
    }
}
