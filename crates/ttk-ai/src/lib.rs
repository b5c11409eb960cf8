//! Short-form script generation.
//!
//! Sends a transcript to an OpenRouter chat completion under a strict JSON
//! contract and validates the answer into a [`ttk_models::ScriptSet`].

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod payload;
pub mod prompt;

pub use client::OpenRouterClient;
pub use config::{AiConfig, DEFAULT_MODEL};
pub use error::{GenerationError, GenerationResult};
pub use generator::ScriptGenerator;
pub use payload::ScriptPayload;
