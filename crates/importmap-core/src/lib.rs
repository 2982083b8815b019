//! # importmap-core
//!
//! Core types and utilities shared across all importmap crates.
//!
//! This crate provides:
//! - `Package`, `Include` and `RemoteFile` types describing what to resolve
//! - The `Provider` trait implemented by every registry backend
//! - Include pattern matching
//! - `ImportmapError` for unified error handling
//! - Path helpers for placing remote files on disk
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types
//! - `provider`: The backend capability
//! - `glob`: Include pattern translation and matching
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod glob;
pub mod provider;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{ImportmapError, ImportmapResult};
pub use provider::{Provider, ResolvedPackage};
pub use types::{extract_file_type, FileType, Include, Package, RemoteFile};
