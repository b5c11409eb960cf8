//! Shared router harness for API tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ttk_ai::{AiConfig, OpenRouterClient, ScriptGenerator};
use ttk_api::auth::{JwtIdentityProvider, SessionClaims};
use ttk_api::{create_router, AccessPolicy, ApiConfig, AppState, ListingCache, ProjectService};
use ttk_models::{InMemoryMemo, RateLimitPolicy, ScriptSet, TranscriptResult, TranscriptSegment};
use ttk_ratelimit::InMemorySlidingWindow;
use ttk_store::InMemoryProjectRepository;
use ttk_transcript::{
    FetchResult, PrimaryTranscriptProvider, SupadataClient, TitleResolver, TranscriptError,
    TranscriptService,
};

pub const JWT_SECRET: &str = "test-secret";
pub const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
pub const OTHER_VIDEO_URL: &str = "https://youtu.be/9bZkp7q19f0";
pub const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";
pub const SUPADATA_PATH: &str = "/v1/youtube/transcript";

/// Primary provider double that counts calls.
pub struct FakePrimary {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakePrimary {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrimaryTranscriptProvider for FakePrimary {
    async fn fetch_by_video_id(&self, video_id: &str) -> FetchResult<Vec<TranscriptSegment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TranscriptError::provider("Transcript is disabled on this video"));
        }
        Ok(vec![
            TranscriptSegment::new("Hello", 0.0, 1.0),
            TranscriptSegment::new(format!("from {}", video_id), 1.0, 1.0),
        ])
    }

    fn name(&self) -> &'static str {
        "fake-primary"
    }
}

struct FixedTitle;

#[async_trait]
impl TitleResolver for FixedTitle {
    async fn resolve_title(&self, _url: &str) -> Option<String> {
        Some("Test Video".to_string())
    }
}

pub struct Harness {
    pub primary_fails: bool,
    /// Replace the routing gate with one that never refuses.
    pub open_gate: bool,
    pub supadata_key: Option<String>,
    pub openrouter_key: Option<String>,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            primary_fails: false,
            open_gate: false,
            supadata_key: Some("sd-key".to_string()),
            openrouter_key: Some("or-key".to_string()),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub primary: Arc<FakePrimary>,
    pub openrouter: MockServer,
    pub supadata: MockServer,
}

impl Harness {
    pub async fn build(self) -> TestApp {
        let openrouter = MockServer::start().await;
        let supadata = MockServer::start().await;
        let http = reqwest::Client::new();

        let primary = Arc::new(FakePrimary {
            fail: self.primary_fails,
            calls: AtomicUsize::new(0),
        });

        let transcripts = TranscriptService::new(
            primary.clone(),
            Arc::new(SupadataClient::new(
                http.clone(),
                supadata.uri(),
                self.supadata_key,
            )),
            Arc::new(FixedTitle),
            Arc::new(InMemoryMemo::<TranscriptResult>::new()),
        );

        let ai_config = AiConfig {
            api_key: self.openrouter_key,
            base_url: openrouter.uri(),
            ..AiConfig::default()
        };
        let generator = ScriptGenerator::new(
            OpenRouterClient::with_client(http, &ai_config),
            Arc::new(InMemoryMemo::<ScriptSet>::new()),
        );

        let projects = ProjectService::new(
            AccessPolicy::with_defaults(None),
            transcripts,
            generator,
            Arc::new(InMemoryProjectRepository::new()),
            ListingCache::with_ttl(std::time::Duration::from_secs(60)),
        );

        let gate = if self.open_gate {
            let store = Arc::new(InMemorySlidingWindow::new(RateLimitPolicy {
                max_requests: u32::MAX,
                ..RateLimitPolicy::gate()
            }));
            AccessPolicy::new(store.clone(), store)
        } else {
            AccessPolicy::gate(None)
        };

        let state = AppState::from_parts(
            ApiConfig::default(),
            Arc::new(JwtIdentityProvider::new(JWT_SECRET)),
            projects,
            gate,
            None,
        );

        TestApp {
            router: create_router(state, None),
            primary,
            openrouter,
            supadata,
        }
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Answer every completion with `count` well-formed scripts.
    pub async fn mock_scripts(&self, count: usize) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(completion(json!({ "scripts": scripts_json(count) })))
            .mount(&self.openrouter)
            .await;
    }

    pub async fn expect_no_completions(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.openrouter)
            .await;
    }
}

pub fn scripts_json(count: usize) -> Value {
    json!((0..count)
        .map(|i| json!({
            "hook": format!("Hook {}", i + 1),
            "script_body": format!("Body {}", i + 1),
            "cta": "Follow for more",
            "visual_cue": "Close up",
        }))
        .collect::<Vec<_>>())
}

pub fn completion(content: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "content": content.to_string() } }]
    }))
}

pub fn token_for(subject: &str) -> String {
    let claims = SessionClaims {
        sub: subject.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        iat: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn try_request(url: &str, fingerprint: Option<&str>, ip: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/try")
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip);
    if let Some(fp) = fingerprint {
        builder = builder.header("x-fingerprint", fp);
    }
    builder
        .body(Body::from(json!({ "url": url }).to_string()))
        .unwrap()
}

pub fn create_request(url: &str, subject: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.50");
    if let Some(subject) = subject {
        builder = builder.header("authorization", format!("Bearer {}", token_for(subject)));
    }
    builder
        .body(Body::from(json!({ "url": url }).to_string()))
        .unwrap()
}

pub fn get_request(uri: &str, subject: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.50");
    if let Some(subject) = subject {
        builder = builder.header("authorization", format!("Bearer {}", token_for(subject)));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
