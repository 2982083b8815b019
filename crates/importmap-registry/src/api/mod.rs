//! Response types for the registry and CDN APIs
//!
//! Only the fields the providers read are modelled; unknown fields are
//! ignored so upstream additions do not break decoding.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// cdnjs `/libraries/{name}` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CdnjsLibrary {
    /// Library name
    #[serde(default)]
    pub name: String,
    /// Default file of the latest version
    #[serde(default)]
    pub filename: String,
    /// Latest version
    #[serde(default)]
    pub version: String,
    /// Every published version
    #[serde(default)]
    pub versions: Vec<String>,
    /// File lists grouped by version
    #[serde(default)]
    pub assets: Vec<CdnjsAssets>,
}

/// One version's file list in a cdnjs response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CdnjsAssets {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub files: Vec<String>,
}

/// jsdelivr `/v1/package/npm/{name}` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsDelivrVersions {
    #[serde(default)]
    pub tags: JsDelivrTags,
    #[serde(default)]
    pub versions: Vec<String>,
}

/// jsdelivr dist tags
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsDelivrTags {
    #[serde(default)]
    pub latest: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// jsdelivr `/v1/package/npm/{name}@{version}` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsDelivrManifest {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// Default entry point, e.g. `/dist/htmx.min.js`
    #[serde(default)]
    pub default: String,
    /// Root of the file tree
    #[serde(default)]
    pub files: Vec<JsDelivrEntry>,
}

/// A node in a jsdelivr file tree
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsDelivrEntry {
    /// `file` or `directory`
    #[serde(rename = "type", default)]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    /// Children of a directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<JsDelivrEntry>,
}

impl JsDelivrEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == "directory"
    }
}

/// unpkg `?meta` directory listing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UnpkgListing {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub files: Vec<UnpkgEntry>,
}

/// One entry of an unpkg listing; paths are absolute within the package
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UnpkgEntry {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl UnpkgEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == "directory"
    }
}

/// npm registry packument, reduced to its dist tags
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NpmDistTags {
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: HashMap<String, String>,
}

/// Skypack `/v1/package/{name}` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SkypackPackage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Skypack `/v1/browse/{name}/{version}` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SkypackBrowse {
    #[serde(default)]
    pub files: Vec<SkypackFile>,
}

/// One file in a Skypack browse listing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SkypackFile {
    pub name: String,
    #[serde(rename = "sizeKB", default)]
    pub size_kb: f64,
    pub url: String,
}
