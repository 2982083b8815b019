//! Package requests and include rules.
//!
//! A `Package` is pure input: it is built by the caller before a run and
//! only its `version` is back-filled once the provider has resolved it.

use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::provider::Provider;

/// Cache directory segment used when no version is known
pub const LATEST_VERSION_DIR: &str = "latest";

/// A selection rule for a package's resolved files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    /// Glob-style pattern matched against a file's local path
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,
    /// Literal URL that bypasses provider resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Explicit output alias
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Include {
    /// Include files matching `pattern`
    pub fn file(pattern: impl Into<String>) -> Self {
        Self {
            file: pattern.into(),
            ..Self::default()
        }
    }

    /// Map an alias straight to a literal URL
    pub fn raw(url: impl Into<String>) -> Self {
        Self {
            raw: Some(url.into()),
            ..Self::default()
        }
    }

    /// Set the output alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Whether this rule is a literal URL rather than a pattern
    pub fn is_raw(&self) -> bool {
        self.raw.as_deref().is_some_and(|raw| !raw.is_empty())
    }

    /// Output alias for files selected by this rule.
    ///
    /// Without an explicit alias the name comes from the pattern's last path
    /// segment: everything before its first `.`, then the last `*`-separated
    /// token of that, so `dist**bootstrap.min.css` becomes `bootstrap`.
    /// Returns an empty string when neither source yields a name.
    pub fn name(&self) -> String {
        if let Some(alias) = self.alias.as_deref().filter(|a| !a.is_empty()) {
            return alias.to_string();
        }

        let trimmed = self.file.trim_end_matches('/');
        let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let stem = base.split('.').next().unwrap_or(base);
        stem.rsplit('*').next().unwrap_or(stem).to_string()
    }
}

/// A request for one logical library
#[derive(Clone, Default)]
pub struct Package {
    /// Registry name, e.g. `htmx.org` or `@scope/pkg`
    pub name: String,
    /// Requested version; `None` resolves the latest release
    pub version: Option<String>,
    /// Selection rules; empty takes every resolved file
    pub include: Vec<Include>,
    /// Overrides the run-level provider for this package
    pub provider: Option<Arc<dyn Provider>>,
    /// Display alias used when a single file is passed through
    pub alias: Option<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = (!version.is_empty()).then_some(version);
        self
    }

    pub fn with_include(mut self, include: Include) -> Self {
        self.include.push(include);
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Alias or name, whichever should label this package in output
    pub fn display_name(&self) -> &str {
        self.alias
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(&self.name)
    }

    /// Requested version, treating an empty string as unset
    pub fn requested_version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }

    /// Directory holding this package's cached files: `<cache>/<name>/<version>`
    pub fn cache_dir(&self, cache_root: &Utf8Path) -> Utf8PathBuf {
        let version = self.requested_version().unwrap_or(LATEST_VERSION_DIR);
        cache_root.join(&self.name).join(version)
    }

    /// Directory holding this package's published files: `<assets>/<name>`.
    ///
    /// The version is not part of the path, so publishing a new version
    /// replaces the files of the previous one.
    pub fn assets_dir(&self, assets_root: &Utf8Path) -> Utf8PathBuf {
        assets_root.join(&self.name)
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("include", &self.include)
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("alias", &self.alias)
            .finish()
    }
}
