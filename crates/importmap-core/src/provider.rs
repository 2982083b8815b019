//! The capability every CDN or registry backend implements.

use async_trait::async_trait;

use crate::error::ImportmapResult;
use crate::types::RemoteFile;

/// Files resolved for one package together with the version they belong to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub files: Vec<RemoteFile>,
    pub version: String,
}

impl ResolvedPackage {
    pub fn new(files: Vec<RemoteFile>, version: impl Into<String>) -> Self {
        Self {
            files,
            version: version.into(),
        }
    }
}

/// Resolves a package name and optional version to concrete remote files.
///
/// Implementations own their version negotiation and listing traversal.
/// An error means the package could not be resolved at all; callers never
/// receive partial results. Dropping the returned future cancels the
/// outstanding request.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Resolve `name` at `version` (`None` resolves the latest release)
    async fn fetch_package_files(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> ImportmapResult<ResolvedPackage>;
}
