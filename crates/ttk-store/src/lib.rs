//! Project persistence.
//!
//! This crate provides:
//! - `ProjectRepository`, the owner-scoped project store interface
//! - A Redis implementation (JSON documents plus a per-owner sorted index)
//! - An in-memory implementation for development and tests

pub mod error;
pub mod memory;
pub mod redis_repo;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryProjectRepository;
pub use redis_repo::RedisProjectRepository;
pub use repository::ProjectRepository;
