//! jsdelivr backend
//!
//! Two requests: the package endpoint lists tags and versions, the
//! versioned endpoint returns the full file tree of that release.

use async_trait::async_trait;
use tracing::debug;

use importmap_core::{FileType, ImportmapResult, Provider, RemoteFile, ResolvedPackage};

use super::negotiate_version;
use crate::api::{JsDelivrEntry, JsDelivrManifest, JsDelivrVersions};
use crate::client::HttpClient;

pub const DEFAULT_API_BASE_URL: &str = "https://data.jsdelivr.com/v1/package/npm/";
pub const DEFAULT_CDN_BASE_URL: &str = "https://cdn.jsdelivr.net/npm/";

/// Local path of the synthetic bundle served in ESM mode
pub const ESM_BUNDLE_PATH: &str = "esm-bundle.js";

/// Resolves npm packages through the jsdelivr data API
#[derive(Debug, Clone)]
pub struct JsDelivr {
    http: HttpClient,
    api_base_url: String,
    cdn_base_url: String,
    esm: bool,
}

impl JsDelivr {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_urls(http, DEFAULT_API_BASE_URL, DEFAULT_CDN_BASE_URL)
    }

    /// Same as `new`, but JavaScript is served as jsdelivr's `+esm` bundle
    pub fn esm(http: HttpClient) -> Self {
        Self::new(http).with_esm(true)
    }

    /// Point the client at other endpoints; both URLs must end with `/`
    pub fn with_base_urls(http: HttpClient, api_base_url: &str, cdn_base_url: &str) -> Self {
        Self {
            http,
            api_base_url: api_base_url.to_string(),
            cdn_base_url: cdn_base_url.to_string(),
            esm: false,
        }
    }

    pub fn with_esm(mut self, esm: bool) -> Self {
        self.esm = esm;
        self
    }

    /// Replace every JavaScript file with the single `+esm` bundle
    fn esm_files(&self, name: &str, version: &str, files: Vec<RemoteFile>) -> Vec<RemoteFile> {
        let bundle = RemoteFile::with_type(
            format!("{}{}@{}/+esm", self.cdn_base_url, name, version),
            ESM_BUNDLE_PATH,
            FileType::Js,
        );

        std::iter::once(bundle)
            .chain(files.into_iter().filter(|f| f.file_type != FileType::Js))
            .collect()
    }
}

/// Flatten a jsdelivr file tree depth first.
///
/// With `dist` set, the first directory named `dist` at a level is walked
/// with the flag cleared and ends the walk of that level; entries listed
/// before it have already been collected.
pub fn walk_files(entries: &[JsDelivrEntry], base_path: &str, prefix: &str, dist: bool) -> Vec<RemoteFile> {
    let mut files = Vec::new();

    for entry in entries {
        if entry.is_directory() {
            let nested = format!("{prefix}{}/", entry.name);

            if dist && entry.name == "dist" {
                files.extend(walk_files(&entry.files, base_path, &nested, false));
                break;
            }

            files.extend(walk_files(&entry.files, base_path, &nested, dist));
            continue;
        }

        let local_path = format!("{prefix}{}", entry.name);
        files.push(RemoteFile::new(format!("{base_path}{local_path}"), local_path));
    }

    files
}

#[async_trait]
impl Provider for JsDelivr {
    fn name(&self) -> &str {
        if self.esm {
            "jsdelivr-esm"
        } else {
            "jsdelivr"
        }
    }

    async fn fetch_package_files(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> ImportmapResult<ResolvedPackage> {
        let url = format!("{}{}", self.api_base_url, name);
        let listing: JsDelivrVersions = self.http.get_json(&url).await?;
        let version = negotiate_version(version, &listing.tags.latest, &listing.versions);

        // The full tree is needed even in ESM mode for stylesheets and the like
        let url = format!("{}{}@{}", self.api_base_url, name, version);
        let manifest: JsDelivrManifest = self.http.get_json(&url).await?;

        let base_path = format!("{}{}@{}/", self.cdn_base_url, name, version);
        let mut files = walk_files(&manifest.files, &base_path, "", manifest.default.contains("dist"));

        if self.esm {
            files = self.esm_files(name, &version, files);
        }

        debug!(package = %name, version = %version, files = files.len(), esm = self.esm, "resolved on jsdelivr");
        Ok(ResolvedPackage::new(files, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn file(name: &str) -> JsDelivrEntry {
        JsDelivrEntry {
            kind: "file".to_string(),
            name: name.to_string(),
            ..JsDelivrEntry::default()
        }
    }

    fn dir(name: &str, files: Vec<JsDelivrEntry>) -> JsDelivrEntry {
        JsDelivrEntry {
            kind: "directory".to_string(),
            name: name.to_string(),
            files,
            ..JsDelivrEntry::default()
        }
    }

    fn local_paths(files: &[RemoteFile]) -> Vec<&str> {
        files.iter().map(|f| f.local_path.as_str()).collect()
    }

    #[test]
    fn test_walk_nested_directories() {
        let tree = vec![
            file("package.json"),
            dir("src", vec![file("index.js"), dir("ext", vec![file("json-enc.js")])]),
        ];

        let files = walk_files(&tree, "https://cdn/x@1/", "", false);
        assert_eq!(local_paths(&files), vec!["package.json", "src/index.js", "src/ext/json-enc.js"]);
        assert_eq!(files[2].path, "https://cdn/x@1/src/ext/json-enc.js");
    }

    #[test]
    fn test_walk_stops_level_at_first_dist() {
        let tree = vec![
            file("LICENSE"),
            dir("dist", vec![file("htmx.min.js"), dir("dist", vec![file("inner.js")])]),
            dir("src", vec![file("htmx.js")]),
        ];

        let files = walk_files(&tree, "https://cdn/x@1/", "", true);
        assert_eq!(
            local_paths(&files),
            vec!["LICENSE", "dist/htmx.min.js", "dist/dist/inner.js"]
        );
    }

    #[test]
    fn test_walk_without_dist_flag_visits_everything() {
        let tree = vec![
            dir("dist", vec![file("htmx.min.js")]),
            dir("src", vec![file("htmx.js")]),
        ];

        let files = walk_files(&tree, "https://cdn/x@1/", "", false);
        assert_eq!(local_paths(&files), vec!["dist/htmx.min.js", "src/htmx.js"]);
    }

    async fn mock_bootstrap(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/package/npm/bootstrap"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tags": { "latest": "5.3.3", "next": "5.3.0-alpha3" },
                "versions": ["5.3.3", "5.3.2", "5.2.0"]
            })))
            .mount(server)
            .await;

        for version in ["5.3.3", "5.2.0"] {
            Mock::given(method("GET"))
                .and(path(format!("/v1/package/npm/bootstrap@{version}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "type": "npm",
                    "name": "bootstrap",
                    "version": version,
                    "default": "/dist/js/bootstrap.min.js",
                    "files": [
                        { "type": "directory", "name": "dist", "files": [
                            { "type": "directory", "name": "css", "files": [
                                { "type": "file", "name": "bootstrap.min.css", "size": 10 }
                            ]},
                            { "type": "directory", "name": "js", "files": [
                                { "type": "file", "name": "bootstrap.min.js", "size": 10 }
                            ]}
                        ]},
                        { "type": "directory", "name": "scss", "files": [
                            { "type": "file", "name": "bootstrap.scss" }
                        ]}
                    ]
                })))
                .mount(server)
                .await;
        }
    }

    fn provider_for(server: &MockServer) -> JsDelivr {
        JsDelivr::with_base_urls(
            HttpClient::new().unwrap(),
            &format!("{}/v1/package/npm/", server.uri()),
            "https://cdn.jsdelivr.net/npm/",
        )
    }

    #[tokio::test]
    async fn test_resolves_requested_version() {
        let server = MockServer::start().await;
        mock_bootstrap(&server).await;

        let resolved = provider_for(&server)
            .fetch_package_files("bootstrap", Some("5.2.0"))
            .await
            .unwrap();
        assert_eq!(resolved.version, "5.2.0");
        assert_eq!(
            resolved.files[1].path,
            "https://cdn.jsdelivr.net/npm/bootstrap@5.2.0/dist/js/bootstrap.min.js"
        );
    }

    #[tokio::test]
    async fn test_unknown_version_falls_back_to_latest() {
        let server = MockServer::start().await;
        mock_bootstrap(&server).await;

        let resolved = provider_for(&server)
            .fetch_package_files("bootstrap", Some("4.0.0"))
            .await
            .unwrap();
        assert_eq!(resolved.version, "5.3.3");
        assert_eq!(
            local_paths(&resolved.files),
            vec!["dist/css/bootstrap.min.css", "dist/js/bootstrap.min.js"]
        );
    }

    #[tokio::test]
    async fn test_esm_mode_replaces_javascript() {
        let server = MockServer::start().await;
        mock_bootstrap(&server).await;

        let resolved = provider_for(&server)
            .with_esm(true)
            .fetch_package_files("bootstrap", None)
            .await
            .unwrap();

        assert_eq!(
            local_paths(&resolved.files),
            vec![ESM_BUNDLE_PATH, "dist/css/bootstrap.min.css"]
        );
        assert_eq!(resolved.files[0].file_type, FileType::Js);
        assert_eq!(resolved.files[0].path, "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/+esm");
        assert_eq!(resolved.files[1].file_type, FileType::Css);
    }
}
