//! OpenRouter chat completion client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AiConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::prompt::{user_prompt, SYSTEM_PROMPT};

const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: std::borrow::Cow<'a, str>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenRouter API client.
pub struct OpenRouterClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    app_url: String,
    app_title: String,
}

impl OpenRouterClient {
    pub fn new(config: &AiConfig) -> GenerationResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &AiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            app_url: config.app_url.clone(),
            app_title: config.app_title.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one completion and return the raw message content.
    pub async fn complete(&self, transcript: &str) -> GenerationResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        info!(
            model = %self.model,
            transcript_chars = transcript.len(),
            "Requesting script generation"
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.into(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(transcript).into(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, COMPLETIONS_PATH))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.app_url)
            .header("X-Title", &self.app_title)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, "OpenRouter returned an error");
            return Err(GenerationError::upstream(format!(
                "OpenRouter API error: {} {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            GenerationError::upstream(format!("Failed to parse OpenRouter response: {}", e))
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::upstream("Empty response from OpenRouter"))
    }
}
