//! Session token authentication.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Decoded session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    /// Expiration
    pub exp: i64,
    /// Issued at
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self { uid: claims.sub }
    }
}

/// Resolves the signed-in user behind a request, if any.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<AuthUser>;
}

/// Verifies HS256 bearer tokens and reads the `sub` claim.
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, ApiError> {
        decode::<SessionClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token validation failed");
                ApiError::Unauthorized
            })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<AuthUser> {
        let token = bearer_token(headers)?;
        let claims = self.verify_token(token).ok()?;
        if claims.sub.is_empty() {
            return None;
        }
        Some(claims.into())
    }
}

/// Used when no signing secret is configured: nobody is signed in.
pub struct AnonymousOnly;

#[async_trait]
impl IdentityProvider for AnonymousOnly {
    async fn authenticate(&self, _headers: &HeaderMap) -> Option<AuthUser> {
        None
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Axum extractor for authenticated user.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        MaybeUser::from_request_parts(parts, state)
            .await?
            .0
            .ok_or(ApiError::Unauthorized)
    }
}

/// Optional session; never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(Self(Some(user.clone())));
        }

        let user = state.identity.authenticate(&parts.headers).await;
        if let Some(user) = &user {
            parts.extensions.insert(user.clone());
        }
        Ok(Self(user))
    }
}
