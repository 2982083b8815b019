//! Local materialization for importmap
//!
//! Remote package files are mirrored into a version-keyed cache and
//! published from there into a flat assets tree served to the browser.

pub mod layout;
pub mod mirror;

// Re-export main types
pub use layout::Layout;
pub use mirror::{Materialized, Materializer};

use importmap_core::error::ImportmapError;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, ImportmapError>;
