//! Provider traits for the transcript tiers.

use async_trait::async_trait;

use ttk_models::TranscriptSegment;

use crate::error::FetchResult;

/// Primary tier: returns ordered caption segments for a video.
#[async_trait]
pub trait PrimaryTranscriptProvider: Send + Sync {
    async fn fetch_by_video_id(&self, video_id: &str) -> FetchResult<Vec<TranscriptSegment>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Fallback tier: returns plain transcript text.
#[async_trait]
pub trait FallbackTranscriptProvider: Send + Sync {
    async fn fetch(&self, url: &str, video_id: &str) -> FetchResult<String>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Advisory title lookup. Failures are reported as `None`.
#[async_trait]
pub trait TitleResolver: Send + Sync {
    async fn resolve_title(&self, url: &str) -> Option<String>;
}
