//! Registry and CDN backends for importmap
//!
//! This crate provides the shared HTTP client and one `Provider`
//! implementation per supported backend: cdnjs, jsdelivr (plain and ESM),
//! esm.sh, unpkg, Skypack, and a raw URL passthrough.

pub mod api;
pub mod client;
pub mod providers;

// Re-export main types
pub use client::{encode_package_name, HttpClient};
pub use providers::{negotiate_version, Cdnjs, EsmSh, JsDelivr, ProviderKind, Raw, Skypack, Unpkg};

use importmap_core::error::ImportmapError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, ImportmapError>;
