//! Utility functions and helpers.
//!
//! Common path handling used by the cache and the assembler.

pub mod path;

// Re-export commonly used utilities
pub use path::{is_safe_path, normalize_path, safe_join, to_url_path, trim_leading_slash};
