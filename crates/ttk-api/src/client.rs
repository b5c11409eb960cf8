//! Anonymous caller context: device fingerprint and client IP.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};
use axum_extra::extract::CookieJar;

/// Header and cookie carrying the device fingerprint.
pub const FINGERPRINT_HEADER: &str = "x-fingerprint";

/// Fingerprint and IP of the caller, both optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub fingerprint: Option<String>,
    pub ip: Option<String>,
}

impl ClientContext {
    pub fn from_parts(headers: &HeaderMap, extensions: &Extensions) -> Self {
        Self {
            fingerprint: extract_fingerprint(headers),
            ip: extract_client_ip(headers, extensions).map(|ip| ip.to_string()),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(&parts.headers, &parts.extensions))
    }
}

/// Fingerprint from the `x-fingerprint` header, else the cookie of that name.
pub fn extract_fingerprint(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FINGERPRINT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            CookieJar::from_headers(headers)
                .get(FINGERPRINT_HEADER)
                .map(|c| c.value().trim().to_string())
                .filter(|v| !v.is_empty())
        })
}

/// Extract client IP from request headers or connection info.
pub fn extract_client_ip(headers: &HeaderMap, extensions: &Extensions) -> Option<IpAddr> {
    // First hop of X-Forwarded-For is the original client
    if let Some(forwarded) = headers.get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse() {
                    return Some(ip);
                }
            }
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            if let Ok(ip) = ip_str.trim().parse() {
                return Some(ip);
            }
        }
    }

    // Requires into_make_service_with_connect_info
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
}
