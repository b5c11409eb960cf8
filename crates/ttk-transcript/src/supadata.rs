//! Supadata transcript API client (fallback tier).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{FetchResult, TranscriptError};
use crate::provider::FallbackTranscriptProvider;

const TRANSCRIPT_PATH: &str = "/v1/youtube/transcript";

/// Reported when the fallback is needed but no key is configured.
pub const MISSING_KEY_MESSAGE: &str =
    "Supadata API key is not configured and primary fetch failed";

/// The response shapes Supadata is known to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackPayload {
    /// `{ "content": "..." }`
    Content(String),
    /// `{ "transcript": "..." }`
    Transcript(String),
    /// A bare JSON string (or a raw non-JSON text body)
    Bare(String),
}

impl FallbackPayload {
    /// Classify a decoded body. The first non-empty shape wins.
    pub fn from_value(value: Value) -> FetchResult<Self> {
        let non_empty = |v: Option<&Value>| {
            v.and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        if let Some(text) = non_empty(value.get("content")) {
            return Ok(Self::Content(text));
        }
        if let Some(text) = non_empty(value.get("transcript")) {
            return Ok(Self::Transcript(text));
        }
        if let Some(text) = non_empty(Some(&value)) {
            return Ok(Self::Bare(text));
        }

        let mut shape = value.to_string();
        shape.truncate(200);
        Err(TranscriptError::UnrecognizedPayload(shape))
    }

    /// Parse a raw response body.
    pub fn from_body(body: &str) -> FetchResult<Self> {
        let value = serde_json::from_str::<Value>(body)
            .unwrap_or_else(|_| Value::String(body.to_string()));
        Self::from_value(value)
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Content(text) | Self::Transcript(text) | Self::Bare(text) => text,
        }
    }
}

/// Supadata API client.
pub struct SupadataClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SupadataClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl FallbackTranscriptProvider for SupadataClient {
    async fn fetch(&self, url: &str, video_id: &str) -> FetchResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TranscriptError::configuration(MISSING_KEY_MESSAGE))?;

        let endpoint = format!("{}{}", self.base_url, TRANSCRIPT_PATH);
        let response = self
            .client
            .get(&endpoint)
            .query(&[("url", url), ("text", "true")])
            .header("x-api-key", api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(video_id = %video_id, status = %status, "Supadata request failed");
            return Err(TranscriptError::provider(format!(
                "Supadata API error: {} {}",
                status, body
            )));
        }

        let text = FallbackPayload::from_body(&body)?.into_text();
        info!(video_id = %video_id, chars = text.len(), "Fetched transcript from Supadata");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "supadata"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const URL: &str = "https://youtu.be/dQw4w9WgXcQ";

    #[test]
    fn test_payload_shapes() {
        assert_eq!(
            FallbackPayload::from_value(json!({ "content": "Hello" })).unwrap(),
            FallbackPayload::Content("Hello".into())
        );
        assert_eq!(
            FallbackPayload::from_value(json!({ "transcript": "Hello" })).unwrap(),
            FallbackPayload::Transcript("Hello".into())
        );
        assert_eq!(
            FallbackPayload::from_value(json!("Hello")).unwrap(),
            FallbackPayload::Bare("Hello".into())
        );
        assert_eq!(
            FallbackPayload::from_body("plain text body").unwrap().into_text(),
            "plain text body"
        );
    }

    #[test]
    fn test_empty_content_falls_through_to_transcript() {
        let payload =
            FallbackPayload::from_value(json!({ "content": "", "transcript": "Hi" })).unwrap();
        assert_eq!(payload, FallbackPayload::Transcript("Hi".into()));
    }

    #[test]
    fn test_unrecognized_payload() {
        let err = FallbackPayload::from_value(json!({ "lang": "en" })).unwrap_err();
        assert!(matches!(err, TranscriptError::UnrecognizedPayload(_)));
        assert!(FallbackPayload::from_value(json!({ "content": "  " })).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = SupadataClient::new(Client::new(), server.uri(), Some("  ".into()));
        assert!(!client.is_configured());

        let err = client.fetch(URL, "dQw4w9WgXcQ").await.unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), MISSING_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn test_fetch_sends_key_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TRANSCRIPT_PATH))
            .and(query_param("url", URL))
            .and(query_param("text", "true"))
            .and(header("x-api-key", "sd-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "Hello World" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SupadataClient::new(Client::new(), server.uri(), Some("sd-key".into()));
        assert_eq!(client.fetch(URL, "dQw4w9WgXcQ").await.unwrap(), "Hello World");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TRANSCRIPT_PATH))
            .respond_with(ResponseTemplate::new(402).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = SupadataClient::new(Client::new(), server.uri(), Some("sd-key".into()));
        let err = client.fetch(URL, "dQw4w9WgXcQ").await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Supadata API error: 402"));
        assert!(message.contains("quota exceeded"));
    }
}
