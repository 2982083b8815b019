//! On-disk layout of the cache and assets directories
//!
//! ```text
//! <root>/
//! ├── <cache_dir>/<name>/<version>/<relative path>
//! └── <assets_dir>/<name>/<relative path>
//! ```
//!
//! The cache is keyed by version; the assets tree is not, so publishing a
//! new version of a package lands on the same paths as the old one.

use camino::{Utf8Path, Utf8PathBuf};

use importmap_core::utils::{safe_join, to_url_path, trim_leading_slash};
use importmap_core::Package;

use crate::CacheResult;

/// File recording which version a package's published files came from
pub const VERSION_STAMP: &str = ".version";

/// Resolved directory layout for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root_dir: Utf8PathBuf,
    cache_dir: Option<Utf8PathBuf>,
    assets_dir: Option<Utf8PathBuf>,
}

impl Layout {
    /// `cache_dir` and `assets_dir` are taken relative to `root_dir` unless
    /// absolute; `None` disables that tier
    pub fn new(
        root_dir: impl Into<Utf8PathBuf>,
        cache_dir: Option<Utf8PathBuf>,
        assets_dir: Option<Utf8PathBuf>,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            cache_dir: cache_dir.filter(|d| !d.as_str().is_empty()),
            assets_dir: assets_dir.filter(|d| !d.as_str().is_empty()),
        }
    }

    pub fn root_dir(&self) -> &Utf8Path {
        &self.root_dir
    }

    /// Absolute cache root, if caching is enabled
    pub fn cache_root(&self) -> Option<Utf8PathBuf> {
        self.cache_dir.as_ref().map(|d| self.root_dir.join(d))
    }

    /// Absolute assets root, if publishing is enabled
    pub fn assets_root(&self) -> Option<Utf8PathBuf> {
        self.assets_dir.as_ref().map(|d| self.root_dir.join(d))
    }

    pub fn caches(&self) -> bool {
        self.cache_dir.is_some()
    }

    pub fn publishes(&self) -> bool {
        self.assets_dir.is_some()
    }

    /// `<root>/<cache>/<name>/<version>/<relative>`
    pub fn cache_path(&self, package: &Package, relative: &str) -> CacheResult<Option<Utf8PathBuf>> {
        self.cache_root()
            .map(|root| safe_join(&package.cache_dir(&root), relative))
            .transpose()
    }

    /// `<root>/<assets>/<name>/<relative>`
    pub fn publish_path(&self, package: &Package, relative: &str) -> CacheResult<Option<Utf8PathBuf>> {
        self.assets_root()
            .map(|root| safe_join(&package.assets_dir(&root), relative))
            .transpose()
    }

    /// `<root>/<assets>/<name>/.version`
    pub fn stamp_path(&self, package: &Package) -> Option<Utf8PathBuf> {
        self.assets_root()
            .map(|root| package.assets_dir(&root).join(VERSION_STAMP))
    }

    /// Browser-facing path of a published file, `/<assets>/<name>/<relative>`
    pub fn publish_url(&self, package: &Package, relative: &str) -> Option<String> {
        self.assets_dir.as_ref().map(|assets| {
            let path = package
                .assets_dir(assets)
                .join(trim_leading_slash(relative));
            to_url_path(path.as_str())
        })
    }
}
