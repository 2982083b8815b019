//! Error types and result aliases for importmap operations.
//!
//! Provides a unified error type that covers every failure the pipeline can
//! surface, from upstream registry responses to filesystem writes.

use thiserror::Error;

/// Unified error type for all importmap operations
#[derive(Error, Debug)]
pub enum ImportmapError {
    // Config errors
    #[error("Failed to parse importmap.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error("Unknown provider '{name}'")]
    UnknownProvider { name: String },

    // Upstream errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{url} responded with status {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Failed to parse {what} for '{package}' from meta output")]
    MetaParse { package: String, what: String },

    #[error("Raw provider URL for '{package}' is empty")]
    EmptyRawUrl { package: String },

    // Output errors
    #[error("Failed to serialize {what}: {message}")]
    Serialize { what: String, message: String },

    // Filesystem errors
    #[error("Refusing to write outside of the target directory: {path}")]
    InvalidPath { path: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for importmap operations
pub type ImportmapResult<T> = Result<T, ImportmapError>;

impl ImportmapError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Check if this error came from talking to a remote backend
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ImportmapError::Network { .. }
                | ImportmapError::UpstreamStatus { .. }
                | ImportmapError::Decode { .. }
                | ImportmapError::MetaParse { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ImportmapError::Network { .. } => Some("Check your internet connection and try again"),
            ImportmapError::UpstreamStatus { status: 404, .. } => {
                Some("Check the package name spelling, or pin a version the provider knows")
            },
            ImportmapError::UnknownProvider { .. } => {
                Some("Use one of: cdnjs, jsdelivr, jsdelivr-esm, esmsh, unpkg, skypack")
            },
            ImportmapError::EmptyRawUrl { .. } => Some("Set 'raw_url' to the full URL of the file"),
            ImportmapError::MetaParse { .. } => {
                Some("The provider returned an unexpected meta format; try another provider")
            },
            ImportmapError::Io { .. } => {
                Some("Check that the cache and assets directories are writable")
            },
            _ => None,
        }
    }
}
