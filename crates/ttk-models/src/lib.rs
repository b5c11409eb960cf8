//! Shared data models for the TubeToTikTok backend.
//!
//! This crate provides Serde-serializable types for:
//! - YouTube URL parsing and video references
//! - Transcripts and their provenance
//! - Generated short-form scripts (validated sets of ten)
//! - Persisted projects
//! - Caller identity and rate-limit decisions
//! - An injectable memo cache shared by the pipeline services

pub mod identity;
pub mod memo;
pub mod project;
pub mod rate_limit;
pub mod script;
pub mod transcript;
pub mod youtube;

// Re-export common types
pub use identity::{Identity, PolicyKind, UNKNOWN_IP};
pub use memo::{InMemoryMemo, Memo, DEFAULT_MEMO_CAPACITY};
pub use project::{Project, ProjectId};
pub use rate_limit::{RateLimitDecision, RateLimitPolicy};
pub use script::{ScriptRecord, ScriptSet, ScriptSetError, SCRIPT_SET_LEN};
pub use transcript::{join_segments, TranscriptResult, TranscriptSegment, TranscriptSource};
pub use youtube::{extract_video_id, validate_url, VideoReference, INVALID_URL_MESSAGE};
