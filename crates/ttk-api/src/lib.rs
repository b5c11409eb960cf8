//! Axum HTTP API server.
//!
//! This crate provides:
//! - Anonymous try-for-free and authenticated project endpoints
//! - HS256 bearer token verification
//! - Access policy (identity + rolling-window quotas) and a routing-layer gate
//! - Security headers, burst limiting and Prometheus metrics

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{AccessPolicy, ListingCache, ProjectService};
pub use state::AppState;
