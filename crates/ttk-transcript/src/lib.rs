//! Two-tier YouTube transcript acquisition.
//!
//! This crate provides:
//! - A caption scraping engine (primary tier)
//! - A Supadata API client (paid fallback tier)
//! - Best-effort oEmbed title lookup
//! - `TranscriptService`, which chains the tiers and memoizes results by URL

pub mod config;
pub mod error;
pub mod oembed;
pub mod provider;
pub mod service;
pub mod supadata;
pub mod youtube;

pub use config::TranscriptConfig;
pub use error::{FetchResult, TranscriptError};
pub use oembed::OembedTitleResolver;
pub use provider::{FallbackTranscriptProvider, PrimaryTranscriptProvider, TitleResolver};
pub use service::{TranscriptService, UNTITLED_VIDEO};
pub use supadata::{FallbackPayload, SupadataClient};
pub use youtube::YoutubeCaptionProvider;
