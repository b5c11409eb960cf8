//! Persisted project models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::script::ScriptSet;
use crate::transcript::{TranscriptResult, TranscriptSource};

/// Unique identifier for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Generate a new random project ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A generated script set saved for its owner.
///
/// Projects are immutable: re-generating from the same URL creates a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    /// Unique project ID
    pub id: ProjectId,

    /// Subject ID of the owning user
    pub owner_id: String,

    /// URL the transcript was fetched for
    pub source_url: String,

    /// Video title (placeholder when the lookup failed)
    pub video_title: String,

    /// Transcript tier that served the text
    pub transcript_source: TranscriptSource,

    /// The ten generated scripts
    pub scripts: ScriptSet,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Build a new project with a fresh ID.
    pub fn new(
        owner_id: impl Into<String>,
        source_url: impl Into<String>,
        transcript: &TranscriptResult,
        scripts: ScriptSet,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            owner_id: owner_id.into(),
            source_url: source_url.into(),
            video_title: transcript.title.clone(),
            transcript_source: transcript.source,
            scripts,
            created_at: Utc::now(),
        }
    }

    /// Whether `subject_id` owns this project.
    pub fn is_owned_by(&self, subject_id: &str) -> bool {
        self.owner_id == subject_id
    }
}
