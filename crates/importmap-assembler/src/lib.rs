//! Import map assembly for importmap
//!
//! This crate drives a run: every package is resolved through its provider,
//! filtered through its include patterns, mirrored to disk when configured
//! and routed into the import map.

pub mod importmap;
pub mod options;
pub mod structure;

// Re-export main types
pub use importmap::ImportMap;
pub use options::{Options, DEFAULT_SHIM_PATH};
pub use structure::Structure;

use importmap_core::error::ImportmapError;

/// Result type for assembler operations
pub type AssemblerResult<T> = Result<T, ImportmapError>;
