//! Rate-limit store error types.

use thiserror::Error;

pub type RateLimitResult<T> = Result<T, RateLimitError>;

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl RateLimitError {
    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::ConnectionFailed(msg.into())
    }
}
