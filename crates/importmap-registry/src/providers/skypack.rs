//! Skypack backend
//!
//! The package endpoint reports the current version and the browse endpoint
//! lists the files of one exact version.

use async_trait::async_trait;
use tracing::debug;

use importmap_core::{FileType, ImportmapResult, Provider, RemoteFile, ResolvedPackage};

use crate::api::{SkypackBrowse, SkypackPackage};
use crate::client::HttpClient;

pub const DEFAULT_PACKAGE_API_BASE_URL: &str = "https://api.skypack.dev/v1/package/";
pub const DEFAULT_BROWSE_API_BASE_URL: &str = "https://api.skypack.dev/v1/browse/";
pub const DEFAULT_CDN_BASE_URL: &str = "https://cdn.skypack.dev/";

/// Resolves packages through the Skypack API
#[derive(Debug, Clone)]
pub struct Skypack {
    http: HttpClient,
    package_api_base_url: String,
    browse_api_base_url: String,
    cdn_base_url: String,
}

impl Skypack {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_urls(
            http,
            DEFAULT_PACKAGE_API_BASE_URL,
            DEFAULT_BROWSE_API_BASE_URL,
            DEFAULT_CDN_BASE_URL,
        )
    }

    /// Point the client at other endpoints; all URLs must end with `/`
    pub fn with_base_urls(http: HttpClient, package_api: &str, browse_api: &str, cdn: &str) -> Self {
        Self {
            http,
            package_api_base_url: package_api.to_string(),
            browse_api_base_url: browse_api.to_string(),
            cdn_base_url: cdn.to_string(),
        }
    }
}

#[async_trait]
impl Provider for Skypack {
    fn name(&self) -> &str {
        "skypack"
    }

    async fn fetch_package_files(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> ImportmapResult<ResolvedPackage> {
        let url = format!("{}{}", self.package_api_base_url, name);
        let package: SkypackPackage = self.http.get_json(&url).await?;

        // A requested version is taken as is; the browse call will fail if it does not exist
        let version = version.map(str::to_string).unwrap_or(package.version);

        let url = format!("{}{}/{}", self.browse_api_base_url, name, version);
        let browse: SkypackBrowse = self.http.get_json(&url).await?;

        let mut files: Vec<RemoteFile> = browse
            .files
            .into_iter()
            .map(|file| RemoteFile::new(file.url, file.name))
            .collect();

        if files.is_empty() {
            // The bare package URL serves the package's entry module
            files.push(RemoteFile::with_type(
                format!("{}{}@{}", self.cdn_base_url, name, version),
                name,
                FileType::Js,
            ));
        }

        debug!(package = %name, version = %version, files = files.len(), "resolved on skypack");
        Ok(ResolvedPackage::new(files, version))
    }
}
