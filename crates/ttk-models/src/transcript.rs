//! Transcript models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which provider tier produced a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSource {
    /// Caption scraping engine
    Primary,
    /// Paid transcript API
    Fallback,
}

impl TranscriptSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptSource::Primary => "primary",
            TranscriptSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One timed caption line from the primary provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    pub text: String,
    /// Start offset in seconds
    pub offset: f64,
    /// Duration in seconds
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, offset: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            offset,
            duration,
        }
    }
}

/// Join ordered segments into plain transcript text.
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Transcript text for a video plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptResult {
    pub text: String,
    pub source: TranscriptSource,
    pub video_id: String,
    pub title: String,
}
