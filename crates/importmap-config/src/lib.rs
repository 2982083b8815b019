//! Configuration parsing for importmap
//!
//! This crate handles parsing and validation of importmap.toml files and
//! layers them with global settings and environment overrides.

pub mod merge;
pub mod toml;

// Re-export main types
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource, CONFIG_FILE};
pub use toml::{ImportmapToml, PackageSpec, SettingsSection};

use importmap_core::error::ImportmapError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ImportmapError>;
