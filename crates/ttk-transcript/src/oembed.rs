//! Best-effort video title lookup via YouTube oEmbed.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::provider::TitleResolver;

#[derive(Debug, Deserialize)]
struct OembedResponse {
    #[serde(default)]
    title: Option<String>,
}

/// oEmbed title resolver.
pub struct OembedTitleResolver {
    client: Client,
    base_url: String,
}

impl OembedTitleResolver {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TitleResolver for OembedTitleResolver {
    async fn resolve_title(&self, url: &str) -> Option<String> {
        let endpoint = format!("{}/oembed", self.base_url);
        let response = match self
            .client
            .get(&endpoint)
            .query(&[("url", url), ("format", "json")])
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(status = %response.status(), "oEmbed lookup returned non-success");
                return None;
            }
            Err(e) => {
                debug!(error = %e, "oEmbed lookup failed");
                return None;
            }
        };

        response
            .json::<OembedResponse>()
            .await
            .ok()
            .and_then(|body| body.title)
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
    }
}
