//! Raw URL passthrough

use async_trait::async_trait;

use importmap_core::error::ImportmapError;
use importmap_core::{extract_file_type, ImportmapResult, Provider, RemoteFile, ResolvedPackage};

/// Serves exactly one known URL, skipping all version negotiation
#[derive(Debug, Clone)]
pub struct Raw {
    url: String,
}

impl Raw {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Provider for Raw {
    fn name(&self) -> &str {
        "raw"
    }

    /// Returns the configured URL as a single file stored under the package
    /// name; the requested version is echoed back unchanged.
    async fn fetch_package_files(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> ImportmapResult<ResolvedPackage> {
        if self.url.is_empty() {
            return Err(ImportmapError::EmptyRawUrl {
                package: name.to_string(),
            });
        }

        let file = RemoteFile::with_type(self.url.as_str(), name, extract_file_type(&self.url));
        Ok(ResolvedPackage::new(vec![file], version.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use importmap_core::FileType;

    #[tokio::test]
    async fn test_passthrough() {
        let raw = Raw::new("https://unpkg.com/htmx.org@1.9.10/dist/htmx.min.js");

        let resolved = raw.fetch_package_files("htmx.org", Some("1.9.10")).await.unwrap();
        assert_eq!(resolved.version, "1.9.10");
        assert_eq!(resolved.files.len(), 1);

        let file = &resolved.files[0];
        assert_eq!(file.path, raw.url());
        assert_eq!(file.local_path, "htmx.org");
        assert_eq!(file.file_type, FileType::Js);
    }

    #[tokio::test]
    async fn test_missing_version_stays_empty() {
        let raw = Raw::new("https://example.com/theme.css");
        let resolved = raw.fetch_package_files("theme", None).await.unwrap();
        assert_eq!(resolved.version, "");
        assert_eq!(resolved.files[0].file_type, FileType::Css);
    }

    #[tokio::test]
    async fn test_empty_url_is_an_error() {
        let result = Raw::new("").fetch_package_files("htmx.org", None).await;
        assert!(matches!(result, Err(ImportmapError::EmptyRawUrl { package }) if package == "htmx.org"));
    }
}
