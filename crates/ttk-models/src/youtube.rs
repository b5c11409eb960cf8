//! YouTube URL parsing.
//!
//! A single pattern covers every accepted URL shape (watch, short-link,
//! embed, `/v/`). Both [`extract_video_id`] and [`validate_url`] are built on
//! it, so input validation and extraction can never disagree.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// User-facing message for URLs that do not reference a YouTube video.
pub const INVALID_URL_MESSAGE: &str = "Invalid YouTube URL";

/// Length of a YouTube video identifier.
pub const VIDEO_ID_LEN: usize = 11;

/// Accepted URL shapes. Capture group 5 is the video identifier.
static YOUTUBE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/(watch\?v=|embed/|v/|.+\?v=)?([^&=%?]{11})",
    )
    .expect("static YouTube URL pattern is valid")
});

/// Extract the 11-character video identifier from a YouTube URL.
///
/// Supports:
/// - https://www.youtube.com/watch?v=VIDEO_ID
/// - https://youtu.be/VIDEO_ID
/// - https://www.youtube.com/embed/VIDEO_ID
/// - https://www.youtube.com/v/VIDEO_ID
///
/// Returns `None` when no shape matches. Never panics.
pub fn extract_video_id(url: &str) -> Option<String> {
    YOUTUBE_URL_RE
        .captures(url)
        .and_then(|caps| caps.get(5))
        .map(|m| m.as_str().to_string())
}

/// Early input check with the same acceptance set as [`extract_video_id`].
pub fn validate_url(url: &str) -> bool {
    extract_video_id(url).is_some()
}

/// A raw URL together with the identifier derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoReference {
    /// URL as supplied by the caller
    pub raw_url: String,
    /// Extracted identifier, absent when the URL matched no known shape
    pub video_id: Option<String>,
}

impl VideoReference {
    /// Parse a raw URL.
    pub fn parse(raw_url: impl Into<String>) -> Self {
        let raw_url = raw_url.into();
        let video_id = extract_video_id(&raw_url);
        Self { raw_url, video_id }
    }

    /// Canonical watch URL for the referenced video.
    pub fn canonical_url(&self) -> Option<String> {
        self.video_id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/watch?v={}", id))
    }
}
