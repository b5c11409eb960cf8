//! Script generation error types.

use thiserror::Error;

pub type GenerationResult<T> = Result<T, GenerationError>;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OPENROUTER_API_KEY is not configured")]
    MissingCredential,

    #[error("{0}")]
    Upstream(String),

    #[error("AI response validation failed: {0}")]
    Validation(String),
}

impl GenerationError {
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Upstream("OpenRouter request timed out".to_string())
        } else {
            Self::Upstream(format!("OpenRouter request failed: {}", e))
        }
    }
}
