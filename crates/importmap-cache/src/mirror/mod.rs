//! Two-tier materialization of remote files
//!
//! Remote files are mirrored into the versioned cache first and copied
//! from there into the assets tree, so rebuilding the assets directory
//! never has to go back to the origin while the cache is intact.

use camino::{Utf8Path, Utf8PathBuf};
use tokio::fs;
use tracing::{debug, info};
use walkdir::WalkDir;

use importmap_core::error::ImportmapError;
use importmap_core::types::package::LATEST_VERSION_DIR;
use importmap_core::utils::to_url_path;
use importmap_core::{Package, RemoteFile};
use importmap_registry::HttpClient;

use crate::layout::{Layout, VERSION_STAMP};
use crate::CacheResult;

pub mod download;

use download::{copy_to, download_to};

/// What an `ensure_*` call had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// The target was already in place
    Present,
    /// Fetched from the network
    Downloaded,
    /// Copied from the cache
    Copied,
    /// The tier is not configured for this run
    Disabled,
}

/// Places remote files into the cache and assets directories
#[derive(Debug, Clone)]
pub struct Materializer {
    http: HttpClient,
    layout: Layout,
}

impl Materializer {
    pub fn new(http: HttpClient, layout: Layout) -> Self {
        Self { http, layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Make sure `relative` of `package` is in the cache.
    ///
    /// An existing cache file is trusted and nothing is fetched.
    pub async fn ensure_cached(&self, package: &Package, relative: &str, remote_url: &str) -> CacheResult<Materialized> {
        let Some(target) = self.layout.cache_path(package, relative)? else {
            return Ok(Materialized::Disabled);
        };

        if target.exists() {
            debug!(path = %target, "cache hit");
            return Ok(Materialized::Present);
        }

        let written = download_to(&self.http, remote_url, &target).await?;
        debug!(url = %remote_url, path = %target, bytes = written, "cached");
        Ok(Materialized::Downloaded)
    }

    /// Make sure `relative` of `package` is in the assets tree.
    ///
    /// A published file is kept only while the package's version stamp
    /// matches `package.version`; otherwise it is replaced. The cache copy
    /// is preferred over the network.
    pub async fn ensure_published(&self, package: &Package, relative: &str, remote_url: &str) -> CacheResult<Materialized> {
        let Some(target) = self.layout.publish_path(package, relative)? else {
            return Ok(Materialized::Disabled);
        };

        if target.exists() && self.is_current(package).await {
            debug!(path = %target, "already published");
            return Ok(Materialized::Present);
        }

        if let Some(cached) = self.layout.cache_path(package, relative)? {
            if cached.exists() {
                copy_to(&cached, &target).await?;
                debug!(from = %cached, to = %target, "published from cache");
                return Ok(Materialized::Copied);
            }
        }

        download_to(&self.http, remote_url, &target).await?;
        debug!(url = %remote_url, path = %target, "published from origin");
        Ok(Materialized::Downloaded)
    }

    /// Record that every file of `package` has been published at its version
    pub async fn mark_published(&self, package: &Package) -> CacheResult<()> {
        let Some(stamp) = self.layout.stamp_path(package) else {
            return Ok(());
        };

        if let Some(parent) = stamp.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ImportmapError::io(format!("Failed to create directory {}", parent), e))?;
        }

        fs::write(&stamp, stamp_value(package))
            .await
            .map_err(|e| ImportmapError::io(format!("Failed to write {}", stamp), e))
    }

    async fn is_current(&self, package: &Package) -> bool {
        let Some(stamp) = self.layout.stamp_path(package) else {
            return false;
        };

        match fs::read_to_string(&stamp).await {
            Ok(recorded) => recorded.trim() == stamp_value(package),
            Err(_) => false,
        }
    }

    /// Remove the cache and assets roots entirely
    pub async fn clean(&self) -> CacheResult<()> {
        for root in [self.layout.cache_root(), self.layout.assets_root()].into_iter().flatten() {
            if !root.exists() {
                continue;
            }

            fs::remove_dir_all(&root)
                .await
                .map_err(|e| ImportmapError::io(format!("Failed to remove {}", root), e))?;
            info!(path = %root, "removed");
        }

        Ok(())
    }

    /// Files already published for `package`, addressed by their URL paths
    pub fn published_files(&self, package: &Package) -> CacheResult<Vec<RemoteFile>> {
        let Some(assets_root) = self.layout.assets_root() else {
            return Ok(Vec::new());
        };

        let base = package.assets_dir(&assets_root);
        if !base.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&base).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let message = format!("Failed to walk {}", base);
                match e.into_io_error() {
                    Some(source) => ImportmapError::io(message, source),
                    None => ImportmapError::InvalidPath { path: base.to_string() },
                }
            })?;

            let name = entry.file_name().to_string_lossy();
            if !entry.file_type().is_file() || name == VERSION_STAMP || name.ends_with(".part") {
                continue;
            }

            let Some(relative) = relative_to(&base, entry.path()) else {
                continue;
            };

            let url = self
                .layout
                .publish_url(package, &relative)
                .unwrap_or_else(|| to_url_path(&relative));
            files.push(RemoteFile::new(url, relative));
        }

        Ok(files)
    }
}

fn stamp_value(package: &Package) -> &str {
    package.requested_version().unwrap_or(LATEST_VERSION_DIR)
}

fn relative_to(base: &Utf8Path, path: &std::path::Path) -> Option<String> {
    let path = Utf8PathBuf::from_path_buf(path.to_path_buf()).ok()?;
    let relative = path.strip_prefix(base).ok()?;
    Some(relative.components().map(|c| c.as_str()).collect::<Vec<_>>().join("/"))
}
