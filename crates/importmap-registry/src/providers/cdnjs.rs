//! cdnjs backend
//!
//! One request to the library endpoint returns the latest version, the list
//! of published versions and the asset file lists.

use async_trait::async_trait;
use tracing::debug;

use importmap_core::{ImportmapResult, Provider, RemoteFile, ResolvedPackage};

use super::negotiate_version;
use crate::api::CdnjsLibrary;
use crate::client::HttpClient;

pub const DEFAULT_API_BASE_URL: &str = "https://api.cdnjs.com/libraries/";
pub const DEFAULT_CDN_BASE_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/";

/// Resolves libraries through the cdnjs API
#[derive(Debug, Clone)]
pub struct Cdnjs {
    http: HttpClient,
    api_base_url: String,
    cdn_base_url: String,
}

impl Cdnjs {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_urls(http, DEFAULT_API_BASE_URL, DEFAULT_CDN_BASE_URL)
    }

    /// Point the client at other endpoints; both URLs must end with `/`
    pub fn with_base_urls(http: HttpClient, api_base_url: &str, cdn_base_url: &str) -> Self {
        Self {
            http,
            api_base_url: api_base_url.to_string(),
            cdn_base_url: cdn_base_url.to_string(),
        }
    }

    fn files_for(&self, library: &CdnjsLibrary, name: &str, version: &str) -> Vec<RemoteFile> {
        let base_path = format!("{}{}/{}/", self.cdn_base_url, name, version);

        let mut files: Vec<RemoteFile> = library
            .assets
            .iter()
            .flat_map(|group| group.files.iter())
            .map(|file| RemoteFile::new(format!("{base_path}{file}"), file.as_str()))
            .collect();

        if files.is_empty() && !library.filename.is_empty() {
            files.push(RemoteFile::new(
                format!("{base_path}{}", library.filename),
                library.filename.as_str(),
            ));
        }

        files
    }
}

#[async_trait]
impl Provider for Cdnjs {
    fn name(&self) -> &str {
        "cdnjs"
    }

    async fn fetch_package_files(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> ImportmapResult<ResolvedPackage> {
        let url = format!("{}{}", self.api_base_url, name);
        let library: CdnjsLibrary = self.http.get_json(&url).await?;

        let version = negotiate_version(version, &library.version, &library.versions);
        let files = self.files_for(&library, name, &version);
        debug!(package = %name, version = %version, files = files.len(), "resolved on cdnjs");

        Ok(ResolvedPackage::new(files, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use importmap_core::{FileType, ImportmapError};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn cdnjs_with(body: serde_json::Value) -> (MockServer, Cdnjs) {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/libraries/htmx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let api = format!("{}/libraries/", mock_server.uri());
        let provider = Cdnjs::with_base_urls(
            HttpClient::new().unwrap(),
            &api,
            "https://cdnjs.cloudflare.com/ajax/libs/",
        );
        (mock_server, provider)
    }

    fn htmx_library() -> serde_json::Value {
        serde_json::json!({
            "name": "htmx",
            "filename": "htmx.min.js",
            "version": "1.8.6",
            "versions": ["1.8.0", "1.8.5", "1.8.6"],
            "assets": [
                { "version": "1.8.6", "files": ["htmx.min.js", "ext/json-enc.js"] }
            ]
        })
    }

    #[tokio::test]
    async fn test_exact_version_is_used() {
        let (_server, cdnjs) = cdnjs_with(htmx_library()).await;

        let resolved = cdnjs.fetch_package_files("htmx", Some("1.8.0")).await.unwrap();
        assert_eq!(resolved.version, "1.8.0");
        assert_eq!(
            resolved.files[0].path,
            "https://cdnjs.cloudflare.com/ajax/libs/htmx/1.8.0/htmx.min.js"
        );
    }

    #[tokio::test]
    async fn test_unknown_version_falls_back_to_latest() {
        let (_server, cdnjs) = cdnjs_with(htmx_library()).await;

        let resolved = cdnjs.fetch_package_files("htmx", Some("9.9.9")).await.unwrap();
        assert_eq!(resolved.version, "1.8.6");
        assert_eq!(
            resolved.files[0].path,
            "https://cdnjs.cloudflare.com/ajax/libs/htmx/1.8.6/htmx.min.js"
        );
    }

    #[tokio::test]
    async fn test_asset_groups_are_flattened() {
        let (_server, cdnjs) = cdnjs_with(htmx_library()).await;

        let resolved = cdnjs.fetch_package_files("htmx", None).await.unwrap();
        let local: Vec<_> = resolved.files.iter().map(|f| f.local_path.as_str()).collect();
        assert_eq!(local, vec!["htmx.min.js", "ext/json-enc.js"]);
        assert!(resolved.files.iter().all(|f| f.file_type == FileType::Js));
        assert_eq!(
            resolved.files[1].path,
            "https://cdnjs.cloudflare.com/ajax/libs/htmx/1.8.6/ext/json-enc.js"
        );
    }

    #[tokio::test]
    async fn test_filename_used_without_assets() {
        let (_server, cdnjs) = cdnjs_with(serde_json::json!({
            "name": "htmx",
            "filename": "htmx.min.js",
            "version": "1.8.6",
            "versions": ["1.8.6"]
        }))
        .await;

        let resolved = cdnjs.fetch_package_files("htmx", Some("1.8.6")).await.unwrap();
        assert_eq!(resolved.files.len(), 1);
        assert_eq!(resolved.files[0].local_path, "htmx.min.js");
    }

    #[tokio::test]
    async fn test_missing_library_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let cdnjs = Cdnjs::with_base_urls(
            HttpClient::new().unwrap(),
            &format!("{}/libraries/", mock_server.uri()),
            DEFAULT_CDN_BASE_URL,
        );
        let result = cdnjs.fetch_package_files("nope", None).await;
        assert!(matches!(result, Err(ImportmapError::UpstreamStatus { status: 404, .. })));
    }
}
