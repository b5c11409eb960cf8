//! Request handlers.

pub mod health;
pub mod projects;
pub mod try_free;

pub use health::*;
pub use projects::*;
pub use try_free::*;
