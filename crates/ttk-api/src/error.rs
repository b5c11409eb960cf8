//! API error types.

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use ttk_ai::GenerationError;
use ttk_models::RateLimitDecision;
use ttk_ratelimit::RateLimitError;
use ttk_store::StoreError;
use ttk_transcript::TranscriptError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Missing fingerprint. Please enable cookies.")]
    MissingFingerprint,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited(RateLimitDecision),

    #[error("{0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    AllSourcesFailed(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::MissingFingerprint => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::AllSourcesFailed(_) | ApiError::Validation(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Unauthorized => "unauthorized",
            ApiError::MissingFingerprint => "missing_fingerprint",
            ApiError::RateLimited(_) => "rate_limited",
            ApiError::NotFound(_) => "not_found",
            ApiError::Configuration(_) => "configuration",
            ApiError::Upstream(_) => "upstream",
            ApiError::AllSourcesFailed(_) => "all_sources_failed",
            ApiError::Validation(_) => "validation",
            ApiError::Internal(_) => "internal",
        }
    }

    /// Whether the message may be shown to the caller verbatim.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidInput(_)
                | ApiError::Unauthorized
                | ApiError::MissingFingerprint
                | ApiError::RateLimited(_)
                | ApiError::NotFound(_)
        )
    }

    fn public_message(&self) -> String {
        if self.is_user_facing() {
            return self.to_string();
        }
        match self {
            ApiError::Upstream(_) | ApiError::Validation(_) => {
                "Failed to generate scripts. Please try again later.".to_string()
            }
            ApiError::AllSourcesFailed(_) => {
                "Could not fetch a transcript for this video.".to_string()
            }
            _ => "An internal error occurred".to_string(),
        }
    }
}

/// `X-RateLimit-*` headers for a decision.
pub fn rate_limit_headers(decision: &RateLimitDecision) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(decision.limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining));
    headers.insert("X-RateLimit-Reset", HeaderValue::from(decision.reset_at_ms));
    headers
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if !self.is_user_facing() {
            error!(code = self.code(), error = %self, "Request failed");
        }

        let body = ErrorResponse {
            detail: self.public_message(),
            code: self.code(),
        };

        match &self {
            ApiError::RateLimited(decision) => {
                let mut headers = rate_limit_headers(decision);
                let retry_after = decision.retry_after_secs(chrono::Utc::now().timestamp_millis());
                headers.insert("Retry-After", HeaderValue::from(retry_after));
                (status, headers, Json(body)).into_response()
            }
            _ => (status, Json(body)).into_response(),
        }
    }
}

impl From<TranscriptError> for ApiError {
    fn from(e: TranscriptError) -> Self {
        match e {
            TranscriptError::InvalidUrl => ApiError::invalid_input(e.to_string()),
            TranscriptError::Configuration(msg) => ApiError::Configuration(msg),
            TranscriptError::AllSourcesFailed(_) => ApiError::AllSourcesFailed(e.to_string()),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::MissingCredential => ApiError::Configuration(e.to_string()),
            GenerationError::Upstream(msg) => ApiError::Upstream(msg),
            GenerationError::Validation(_) => ApiError::Validation(e.to_string()),
        }
    }
}

impl From<RateLimitError> for ApiError {
    fn from(e: RateLimitError) -> Self {
        ApiError::internal(format!("Rate limit store unavailable: {}", e))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::internal(format!("Project store unavailable: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::invalid_input("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingFingerprint.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Configuration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_provider_details_are_hidden() {
        let err = ApiError::Upstream("OpenRouter API error: 401 {\"key\":\"sk-...\"}".into());
        assert!(!err.is_user_facing());
        assert!(!err.public_message().contains("sk-"));

        let err = ApiError::invalid_input("Invalid YouTube URL");
        assert_eq!(err.public_message(), "Invalid YouTube URL");
    }

    #[test]
    fn test_transcript_error_mapping() {
        assert!(matches!(
            ApiError::from(TranscriptError::InvalidUrl),
            ApiError::InvalidInput(_)
        ));
        assert!(matches!(
            ApiError::from(TranscriptError::configuration("no key")),
            ApiError::Configuration(_)
        ));
        assert!(matches!(
            ApiError::from(TranscriptError::AllSourcesFailed("boom".into())),
            ApiError::AllSourcesFailed(_)
        ));
    }

    #[test]
    fn test_rate_limited_response_headers() {
        let decision = RateLimitDecision {
            allowed: false,
            limit: 1,
            remaining: 0,
            reset_at_ms: chrono::Utc::now().timestamp_millis() + 5_000,
        };
        let response = ApiError::RateLimited(decision).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["X-RateLimit-Limit"], "1");
        assert_eq!(response.headers()["X-RateLimit-Remaining"], "0");
        assert!(response.headers().contains_key("Retry-After"));
    }
}
