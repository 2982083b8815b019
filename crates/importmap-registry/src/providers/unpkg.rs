//! unpkg backend
//!
//! unpkg lists one directory per `?meta` request, so the walk issues a
//! request per subdirectory. Unversioned requests first ask the npm
//! registry for the `latest` dist tag.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, warn};

use importmap_core::error::ImportmapError;
use importmap_core::utils::trim_leading_slash;
use importmap_core::{ImportmapResult, Provider, RemoteFile, ResolvedPackage};

use crate::api::{NpmDistTags, UnpkgEntry, UnpkgListing};
use crate::client::{encode_package_name, HttpClient};

pub const DEFAULT_CDN_BASE_URL: &str = "https://unpkg.com/";
pub const DEFAULT_NPM_REGISTRY_URL: &str = "https://registry.npmjs.org/";

/// Resolves npm packages by walking unpkg directory listings
#[derive(Debug, Clone)]
pub struct Unpkg {
    http: HttpClient,
    cdn_base_url: String,
    registry_url: String,
}

impl Unpkg {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_urls(http, DEFAULT_CDN_BASE_URL, DEFAULT_NPM_REGISTRY_URL)
    }

    /// Point the client at other endpoints; both URLs must end with `/`
    pub fn with_base_urls(http: HttpClient, cdn_base_url: &str, registry_url: &str) -> Self {
        Self {
            http,
            cdn_base_url: cdn_base_url.to_string(),
            registry_url: registry_url.to_string(),
        }
    }

    /// Look up the `latest` dist tag in the npm registry
    async fn latest_version(&self, name: &str) -> ImportmapResult<String> {
        let url = format!("{}{}", self.registry_url, encode_package_name(name));
        let packument: NpmDistTags = self.http.get_json(&url).await?;

        packument
            .dist_tags
            .get("latest")
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| ImportmapError::Decode {
                url,
                message: "no 'latest' dist tag".to_string(),
            })
    }

    /// Collect the files below `entries`.
    ///
    /// A subdirectory whose listing cannot be fetched or decoded is left out;
    /// its siblings are still walked.
    fn walk<'a>(&'a self, entries: Vec<UnpkgEntry>, base_path: &'a str) -> BoxFuture<'a, Vec<RemoteFile>> {
        async move {
            let mut files = Vec::new();

            for entry in entries {
                let relative = trim_leading_slash(&entry.path);

                if !entry.is_directory() {
                    files.push(RemoteFile::new(format!("{base_path}{relative}"), relative));
                    continue;
                }

                let url = format!("{base_path}{relative}/?meta");
                match self.http.get_json::<UnpkgListing>(&url).await {
                    Ok(listing) => files.extend(self.walk(listing.files, base_path).await),
                    Err(e) => warn!(url = %url, error = %e, "skipping unpkg directory"),
                }
            }

            files
        }
        .boxed()
    }
}

#[async_trait]
impl Provider for Unpkg {
    fn name(&self) -> &str {
        "unpkg"
    }

    async fn fetch_package_files(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> ImportmapResult<ResolvedPackage> {
        let version = match version {
            Some(version) => version.to_string(),
            None => self.latest_version(name).await?,
        };

        let base_path = format!("{}{}@{}/", self.cdn_base_url, name, version);
        let listing: UnpkgListing = self.http.get_json(&format!("{base_path}?meta")).await?;

        let files = self.walk(listing.files, &base_path).await;
        debug!(package = %name, version = %version, files = files.len(), "resolved on unpkg");

        Ok(ResolvedPackage::new(files, version))
    }
}
