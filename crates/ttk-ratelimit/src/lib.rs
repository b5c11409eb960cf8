//! Sliding-window rate limiting.
//!
//! This crate provides:
//! - `RateLimitStore`, one increment-and-check per call, bound to a policy
//! - A Redis implementation backed by an atomic Lua script
//! - An in-process implementation for development and tests

pub mod error;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use error::{RateLimitError, RateLimitResult};
pub use memory::InMemorySlidingWindow;
pub use redis_store::RedisSlidingWindow;
pub use store::{build_store, RateLimitStore};
