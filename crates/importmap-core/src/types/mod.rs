//! Core data types for import map assembly.
//!
//! This module provides the fundamental types used throughout the workspace:
//! - File classification and resolved remote files
//! - Package requests and their include rules

pub mod file;
pub mod package;

// Re-export all public types
pub use file::{extract_file_type, FileType, RemoteFile};
pub use package::{Include, Package};
