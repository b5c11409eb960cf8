//! API middleware.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::{HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn, Span};
use uuid::Uuid;

use ttk_models::Identity;

use crate::auth::MaybeUser;
use crate::client::{extract_client_ip, ClientContext};
use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

/// Maximum number of IPs tracked by the burst limiter before pruning.
const MAX_BURST_LIMITER_ENTRIES: usize = 10_000;

type KeyedLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Per-IP burst limiter in front of the expensive routes.
pub struct BurstLimiter {
    limiter: KeyedLimiter,
}

impl BurstLimiter {
    pub fn new(requests_per_second: u32, burst: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst).unwrap_or(rps);
        Self {
            limiter: RateLimiter::keyed(Quota::per_second(rps).allow_burst(burst)),
        }
    }

    /// Check rate limit for an IP.
    pub fn check(&self, ip: IpAddr) -> bool {
        if self.limiter.len() > MAX_BURST_LIMITER_ENTRIES {
            self.limiter.retain_recent();
        }
        self.limiter.check_key(&ip).is_ok()
    }
}

/// Create CORS layer.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    use axum::http::{header, HeaderName};

    let allowed_headers = [
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::ORIGIN,
        HeaderName::from_static("x-fingerprint"),
    ];

    let exposed_headers = [
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderName::from_static("x-ratelimit-reset"),
        header::RETRY_AFTER,
    ];

    let allowed_methods = [Method::GET, Method::POST, Method::OPTIONS];

    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any)
            .allow_origin(Any)
            .max_age(std::time::Duration::from_secs(600))
    } else {
        // Credentials cannot be combined with wildcard headers
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
            .expose_headers(exposed_headers)
            .allow_credentials(true)
            .allow_origin(origins)
            .max_age(std::time::Duration::from_secs(600))
    }
}

/// Security headers middleware.
pub async fn security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Strict-Transport-Security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("camera=(), geolocation=(), microphone=(), payment=()"),
    );
    headers.insert("Cross-Origin-Resource-Policy", HeaderValue::from_static("same-origin"));

    response
}

/// Request ID middleware.
pub async fn request_id(mut request: Request<Body>, next: Next) -> Response<Body> {
    let request_id = request
        .headers()
        .get("X-Request-ID")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(request_id.clone());
    Span::current().record("request_id", &request_id);

    let mut response = next.run(request).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-ID", header_value);
    }

    response
}

/// Request logging middleware.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration = start.elapsed();

    // Skip probe noise
    if uri.path() != "/health" && uri.path() != "/ready" && uri.path() != "/metrics" {
        info!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

/// Per-IP burst limiting.
pub async fn burst_limit_middleware(
    State(limiter): State<Arc<BurstLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    if let Some(ip) = extract_client_ip(request.headers(), request.extensions()) {
        if !limiter.check(ip) {
            warn!(ip = %ip, "Burst limit exceeded");
            metrics::record_rate_limit_hit("burst");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", "1")],
                "Rate limit exceeded. Please try again later.",
            )
                .into_response();
        }
    }

    next.run(request).await
}

/// Routing-layer quota gate for the generating routes.
///
/// Only `POST` requests are counted; reads pass straight through. Resolves
/// the caller the same way the services do and counts against the coarse
/// gate policy, never the services' own buckets. Callers with no derivable
/// identity pass through so the handler can reject them with a precise error.
pub async fn gate_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let user = MaybeUser::from_request_parts(&mut parts, &state)
        .await
        .map(|m| m.0)
        .unwrap_or(None);
    let client = ClientContext::from_parts(&parts.headers, &parts.extensions);
    let request = Request::from_parts(parts, body);

    let identity = Identity::resolve(
        user.as_ref().map(|u| u.uid.as_str()),
        client.fingerprint.as_deref(),
        client.ip.as_deref(),
    );

    if let Some(identity) = identity {
        match state.gate.decide(&identity).await {
            Ok(decision) if !decision.allowed => {
                warn!(policy = ?identity.policy_kind(), "Gate rejected request");
                metrics::record_rate_limit_hit("gate");
                return ApiError::RateLimited(decision).into_response();
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Gate counter unavailable, deferring to service check"),
        }
    }

    next.run(request).await
}
