//! Resolved remote files and their classification.

use serde::{Deserialize, Serialize};

/// Kind of asset a file represents in the rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// JavaScript module, routed into `imports`
    Js,
    /// Stylesheet, routed into `styles`
    Css,
    /// Anything else; never surfaced in the output
    Other,
}

/// Classify a filename or URL by its extension.
///
/// Only the final extension counts and the comparison is case sensitive,
/// so `app.min.js` is JavaScript while `app.JS` and `app.js.map` are not.
pub fn extract_file_type(filename: &str) -> FileType {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    match base.rsplit_once('.') {
        Some((stem, "js" | "mjs")) if !stem.is_empty() => FileType::Js,
        Some((stem, "css")) if !stem.is_empty() => FileType::Css,
        _ => FileType::Other,
    }
}

/// One file resolved by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Classification derived from the extension
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// Absolute remote URL
    pub path: String,
    /// Path relative to the package root, used for matching and placement
    pub local_path: String,
}

impl RemoteFile {
    /// Create a file, classifying it by `local_path`
    pub fn new(path: impl Into<String>, local_path: impl Into<String>) -> Self {
        let local_path = local_path.into();
        Self {
            file_type: extract_file_type(&local_path),
            path: path.into(),
            local_path,
        }
    }

    /// Create a file classified by an explicit name rather than its local path
    pub fn with_type(path: impl Into<String>, local_path: impl Into<String>, file_type: FileType) -> Self {
        Self {
            file_type,
            path: path.into(),
            local_path: local_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_file_type() {
        assert_eq!(extract_file_type("htmx.min.js"), FileType::Js);
        assert_eq!(extract_file_type("dist/es2022/bootstrap.mjs"), FileType::Js);
        assert_eq!(extract_file_type("css/bootstrap.min.css"), FileType::Css);
        assert_eq!(extract_file_type("bootstrap.min.css.map"), FileType::Other);
        assert_eq!(extract_file_type("LICENSE"), FileType::Other);
        assert_eq!(extract_file_type("README.md"), FileType::Other);
    }

    #[test]
    fn test_extension_needs_a_stem() {
        assert_eq!(extract_file_type(".js"), FileType::Other);
        assert_eq!(extract_file_type("dir.css/file"), FileType::Other);
    }

    #[test]
    fn test_remote_file_classifies_local_path() {
        let file = RemoteFile::new("https://cdn.example.com/x/1.0.0/x.css", "x.css");
        assert_eq!(file.file_type, FileType::Css);
        assert_eq!(file.local_path, "x.css");
    }

    proptest! {
        #[test]
        fn prop_js_suffix_is_js(stem in "[a-z][a-z0-9_.-]{0,12}") {
            let name = format!("{stem}.js");
            prop_assert_eq!(extract_file_type(&name), FileType::Js);
            let nested = format!("dist/{stem}.css");
            prop_assert_eq!(extract_file_type(&nested), FileType::Css);
        }
    }
}
