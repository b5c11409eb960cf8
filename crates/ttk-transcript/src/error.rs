//! Transcript acquisition error types.

use thiserror::Error;

pub type FetchResult<T> = Result<T, TranscriptError>;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("{0}")]
    Configuration(String),

    #[error("Failed to fetch transcript from all sources. Last error: {0}")]
    AllSourcesFailed(String),

    #[error("{0}")]
    Provider(String),

    #[error("Invalid response format from transcript provider: {0}")]
    UnrecognizedPayload(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl TranscriptError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// True for failures caused by the deployment rather than the provider.
    pub fn is_configuration(&self) -> bool {
        matches!(self, TranscriptError::Configuration(_))
    }
}
