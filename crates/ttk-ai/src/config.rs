//! Script generation configuration.

use std::time::Duration;

/// Default model id.
pub const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";

/// Default OpenRouter origin.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai";

#[derive(Debug, Clone)]
pub struct AiConfig {
    /// OpenRouter API key (generation is unavailable without it)
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Sent as `HTTP-Referer` for attribution
    pub app_url: String,
    /// Sent as `X-Title` for attribution
    pub app_title: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            app_url: "https://tubetotiktok.com".to_string(),
            app_title: "TubeToTikTok".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl AiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("OPENROUTER_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("OPENROUTER_MODEL").unwrap_or(defaults.model),
            app_url: std::env::var("APP_URL").unwrap_or(defaults.app_url),
            app_title: std::env::var("APP_TITLE").unwrap_or(defaults.app_title),
            timeout: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}
