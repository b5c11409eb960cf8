//! Two-tier transcript acquisition service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use ttk_models::{extract_video_id, join_segments, InMemoryMemo, Memo, TranscriptResult, TranscriptSource};

use crate::config::TranscriptConfig;
use crate::error::{FetchResult, TranscriptError};
use crate::oembed::OembedTitleResolver;
use crate::provider::{FallbackTranscriptProvider, PrimaryTranscriptProvider, TitleResolver};
use crate::supadata::SupadataClient;
use crate::youtube::YoutubeCaptionProvider;

/// Title used when the lookup fails.
pub const UNTITLED_VIDEO: &str = "Untitled Video";

const FETCH_COUNTER: &str = "ttk_transcript_fetch_total";

/// Fetches transcripts: primary scraper first, paid API as fallback.
#[derive(Clone)]
pub struct TranscriptService {
    primary: Arc<dyn PrimaryTranscriptProvider>,
    fallback: Arc<dyn FallbackTranscriptProvider>,
    titles: Arc<dyn TitleResolver>,
    cache: Arc<dyn Memo<TranscriptResult>>,
    primary_timeout: Duration,
}

impl TranscriptService {
    pub fn new(
        primary: Arc<dyn PrimaryTranscriptProvider>,
        fallback: Arc<dyn FallbackTranscriptProvider>,
        titles: Arc<dyn TitleResolver>,
        cache: Arc<dyn Memo<TranscriptResult>>,
    ) -> Self {
        Self {
            primary,
            fallback,
            titles,
            cache,
            primary_timeout: Duration::from_secs(30),
        }
    }

    /// Bound the primary tier; a timeout counts as a primary failure.
    pub fn with_primary_timeout(mut self, timeout: Duration) -> Self {
        self.primary_timeout = timeout;
        self
    }

    /// Production wiring: caption scraper, Supadata, oEmbed, TTL memo.
    pub fn from_config(config: &TranscriptConfig) -> FetchResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self::new(
            Arc::new(YoutubeCaptionProvider::new(
                client.clone(),
                config.youtube_base_url.clone(),
            )),
            Arc::new(SupadataClient::new(
                client.clone(),
                config.supadata_base_url.clone(),
                config.supadata_api_key.clone(),
            )),
            Arc::new(OembedTitleResolver::new(client, config.youtube_base_url.clone())),
            Arc::new(InMemoryMemo::<TranscriptResult>::with_ttl(config.cache_ttl)),
        )
        .with_primary_timeout(config.timeout))
    }

    /// Transcript for `url`, memoized by the exact URL string.
    pub async fn fetch_transcript(&self, url: &str) -> FetchResult<TranscriptResult> {
        if let Some(cached) = self.cache.get(url).await {
            info!(video_id = %cached.video_id, "Transcript cache hit");
            return Ok(cached);
        }

        let video_id = extract_video_id(url).ok_or(TranscriptError::InvalidUrl)?;

        let title = self
            .titles
            .resolve_title(url)
            .await
            .unwrap_or_else(|| UNTITLED_VIDEO.to_string());

        let (text, source) = match self.fetch_primary(&video_id).await {
            Ok(text) => (text, TranscriptSource::Primary),
            Err(e) => {
                warn!(
                    video_id = %video_id,
                    provider = self.primary.name(),
                    error = %e,
                    "Primary transcript fetch failed, trying fallback"
                );
                let text = self.fetch_fallback(url, &video_id).await?;
                (text, TranscriptSource::Fallback)
            }
        };

        metrics::counter!(FETCH_COUNTER, "source" => source.as_str()).increment(1);
        info!(
            video_id = %video_id,
            source = %source,
            chars = text.len(),
            "Fetched transcript"
        );

        let result = TranscriptResult {
            text,
            source,
            video_id,
            title,
        };
        self.cache.set(url.to_string(), result.clone()).await;
        Ok(result)
    }

    /// Drop all memoized transcripts.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    async fn fetch_primary(&self, video_id: &str) -> FetchResult<String> {
        let segments = tokio::time::timeout(
            self.primary_timeout,
            self.primary.fetch_by_video_id(video_id),
        )
        .await
        .map_err(|_| TranscriptError::provider("Primary transcript fetch timed out"))??;

        let text = join_segments(&segments);
        if text.is_empty() {
            return Err(TranscriptError::provider("Primary provider returned no captions"));
        }
        Ok(text)
    }

    async fn fetch_fallback(&self, url: &str, video_id: &str) -> FetchResult<String> {
        match self.fallback.fetch(url, video_id).await {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => Err(TranscriptError::AllSourcesFailed(
                "Fallback provider returned an empty transcript".to_string(),
            )),
            Err(e) if e.is_configuration() => Err(e),
            Err(e) => {
                warn!(
                    video_id = %video_id,
                    provider = self.fallback.name(),
                    error = %e,
                    "Fallback transcript fetch failed"
                );
                Err(TranscriptError::AllSourcesFailed(e.to_string()))
            }
        }
    }
}
