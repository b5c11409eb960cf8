//! Business services.

pub mod listing_cache;
pub mod policy;
pub mod project;

pub use listing_cache::ListingCache;
pub use policy::AccessPolicy;
pub use project::{ProjectService, TryFreeOutcome};
