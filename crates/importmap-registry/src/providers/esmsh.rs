//! esm.sh backend
//!
//! esm.sh has no listing API. Its `?meta` response is a JavaScript module
//! whose header comment names the resolved version and whose re-export
//! points at the built entry file. Both are scraped from the text.

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use importmap_core::error::ImportmapError;
use importmap_core::utils::trim_leading_slash;
use importmap_core::{ImportmapResult, Provider, RemoteFile, ResolvedPackage};

use crate::client::HttpClient;

pub const DEFAULT_API_BASE_URL: &str = "https://esm.sh/";

/// Resolves a package to the single module esm.sh builds for it
#[derive(Debug, Clone)]
pub struct EsmSh {
    http: HttpClient,
    api_base_url: String,
}

/// Version and entry path scraped from a `?meta` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaModule {
    pub version: String,
    /// Root-relative path such as `/bootstrap@5.3.3/es2022/bootstrap.mjs`
    pub export_path: String,
}

impl EsmSh {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, DEFAULT_API_BASE_URL)
    }

    /// Point the client at another host; the URL must end with `/`
    pub fn with_base_url(http: HttpClient, api_base_url: &str) -> Self {
        Self {
            http,
            api_base_url: api_base_url.to_string(),
        }
    }
}

/// Scrape the version and export path for `name` out of a meta module.
///
/// Both patterns are anchored to the package name; a response missing
/// either one is an error since there is nothing to fall back to.
pub fn parse_meta(name: &str, text: &str) -> ImportmapResult<MetaModule> {
    let quoted = regex::escape(name);

    let version_re = Regex::new(&format!(r"/\*\s*esm\.sh\s*-\s*{quoted}@([^\s*]+)"))
        .map_err(|_| meta_error(name, "version"))?;
    let version = version_re
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| meta_error(name, "version"))?;

    let export_re = Regex::new(&format!(r#"export\s+\*\s+from\s+["'](/{quoted}@[^"']+)["']"#))
        .map_err(|_| meta_error(name, "export path"))?;
    let export_path = export_re
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| meta_error(name, "export path"))?;

    Ok(MetaModule { version, export_path })
}

fn meta_error(name: &str, what: &str) -> ImportmapError {
    ImportmapError::MetaParse {
        package: name.to_string(),
        what: what.to_string(),
    }
}

#[async_trait]
impl Provider for EsmSh {
    fn name(&self) -> &str {
        "esmsh"
    }

    async fn fetch_package_files(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> ImportmapResult<ResolvedPackage> {
        let package_id = match version {
            Some(version) => format!("{name}@{version}"),
            None => name.to_string(),
        };

        let url = format!("{}{}?meta", self.api_base_url, package_id);
        let text = self.http.get_text(&url).await?;
        let meta = parse_meta(name, &text)?;

        let file_url = format!("{}{}", self.api_base_url.trim_end_matches('/'), meta.export_path);
        let file = RemoteFile::new(file_url, trim_leading_slash(&meta.export_path));
        debug!(package = %name, version = %meta.version, path = %file.path, "resolved on esm.sh");

        Ok(ResolvedPackage::new(vec![file], meta.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use importmap_core::FileType;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BOOTSTRAP_META: &str = r#"/* esm.sh - bootstrap@5.3.3 */
import "/@popperjs/core@2.11.8/es2022/core.mjs";
export * from "/bootstrap@5.3.3/es2022/bootstrap.mjs";
"#;

    #[test]
    fn test_parse_meta() {
        let meta = parse_meta("bootstrap", BOOTSTRAP_META).unwrap();
        assert_eq!(meta.version, "5.3.3");
        assert_eq!(meta.export_path, "/bootstrap@5.3.3/es2022/bootstrap.mjs");
    }

    #[test]
    fn test_parse_meta_anchors_to_package_name() {
        let result = parse_meta("popper", BOOTSTRAP_META);
        assert!(matches!(result, Err(ImportmapError::MetaParse { what, .. }) if what == "version"));
    }

    #[test]
    fn test_parse_meta_requires_export() {
        let result = parse_meta("bootstrap", "/* esm.sh - bootstrap@5.3.3 */\n");
        assert!(matches!(result, Err(ImportmapError::MetaParse { what, .. }) if what == "export path"));
    }

    #[test]
    fn test_parse_meta_scoped_name() {
        let text = r#"/* esm.sh - @hotwired/stimulus@3.2.2 */
export * from "/@hotwired/stimulus@3.2.2/es2022/stimulus.mjs";"#;
        let meta = parse_meta("@hotwired/stimulus", text).unwrap();
        assert_eq!(meta.version, "3.2.2");
        assert_eq!(meta.export_path, "/@hotwired/stimulus@3.2.2/es2022/stimulus.mjs");
    }

    #[tokio::test]
    async fn test_fetch_builds_single_module() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bootstrap@5.3.3"))
            .and(query_param("meta", ""))
            .respond_with(ResponseTemplate::new(200).set_body_string(BOOTSTRAP_META))
            .mount(&server)
            .await;

        let esm = EsmSh::with_base_url(HttpClient::new().unwrap(), &format!("{}/", server.uri()));
        let resolved = esm.fetch_package_files("bootstrap", Some("5.3.3")).await.unwrap();

        assert_eq!(resolved.version, "5.3.3");
        assert_eq!(resolved.files.len(), 1);
        let file = &resolved.files[0];
        assert_eq!(file.path, format!("{}/bootstrap@5.3.3/es2022/bootstrap.mjs", server.uri()));
        assert_eq!(file.local_path, "bootstrap@5.3.3/es2022/bootstrap.mjs");
        assert_eq!(file.file_type, FileType::Js);
    }

    #[tokio::test]
    async fn test_unparsable_meta_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/htmx.org"))
            .respond_with(ResponseTemplate::new(200).set_body_string("export default {}"))
            .mount(&server)
            .await;

        let esm = EsmSh::with_base_url(HttpClient::new().unwrap(), &format!("{}/", server.uri()));
        let result = esm.fetch_package_files("htmx.org", None).await;
        assert!(matches!(result, Err(ImportmapError::MetaParse { .. })));
    }
}
