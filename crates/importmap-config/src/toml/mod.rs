//! importmap.toml configuration parsing and serialization

use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use importmap_assembler::options::{default_root_dir, DEFAULT_SHIM_PATH};
use importmap_assembler::Options;
use importmap_core::error::ImportmapError;
use importmap_core::{Include, Package};
use importmap_registry::{HttpClient, ProviderKind, Raw};

use crate::ConfigResult;

/// Complete importmap.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportmapToml {
    /// Run-level settings
    #[serde(default)]
    pub settings: SettingsSection,

    /// Requested packages, in output order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<PackageSpec>,
}

/// `[settings]` section. Every field is optional so that layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsSection {
    /// Default provider for packages without their own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Directory the cache and assets directories are relative to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<Utf8PathBuf>,

    /// Version-keyed mirror; absent disables caching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Published files; absent keeps remote URLs in the output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<Utf8PathBuf>,

    /// Base URL of the module-loader shim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shim_path: Option<String>,

    /// Whether the rendered snippet loads the shim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_shim: Option<bool>,

    /// Remove the cache and assets directories before fetching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
}

/// One `[[packages]]` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Registry name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Provider override for this package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Fetch this exact URL instead of asking a provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_url: Option<String>,

    /// Import key used when the package resolves to a single file
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<Include>,
}

impl SettingsSection {
    /// Provider selected for the run, cdnjs when unset
    pub fn provider_kind(&self) -> ConfigResult<ProviderKind> {
        match self.provider.as_deref() {
            Some(name) if !name.is_empty() => ProviderKind::from_str(name),
            _ => Ok(ProviderKind::default()),
        }
    }

    pub fn shim_path(&self) -> &str {
        self.shim_path.as_deref().unwrap_or(DEFAULT_SHIM_PATH)
    }

    pub fn include_shim(&self) -> bool {
        self.include_shim.unwrap_or(true)
    }

    pub fn clean(&self) -> bool {
        self.clean.unwrap_or(false)
    }

    /// Run options; a relative `root_dir` is taken from `base_dir`, and an
    /// unset one falls back to `base_dir` or else the executable's directory
    pub fn to_options(&self, base_dir: Option<&Utf8Path>) -> Options {
        let root_dir = match (&self.root_dir, base_dir) {
            (Some(root), _) if root.is_absolute() => root.clone(),
            (Some(root), Some(base)) => base.join(root),
            (Some(root), None) => root.clone(),
            (None, Some(base)) => base.to_path_buf(),
            (None, None) => default_root_dir(),
        };

        Options {
            root_dir,
            cache_dir: self.cache_dir.clone(),
            assets_dir: self.assets_dir.clone(),
            shim_path: self.shim_path().to_string(),
            include_shim: self.include_shim(),
            clean: self.clean(),
        }
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: SettingsSection) -> SettingsSection {
        SettingsSection {
            provider: self.provider.or(fallback.provider),
            root_dir: self.root_dir.or(fallback.root_dir),
            cache_dir: self.cache_dir.or(fallback.cache_dir),
            assets_dir: self.assets_dir.or(fallback.assets_dir),
            shim_path: self.shim_path.or(fallback.shim_path),
            include_shim: self.include_shim.or(fallback.include_shim),
            clean: self.clean.or(fallback.clean),
        }
    }
}

impl PackageSpec {
    /// Build the runtime package request.
    ///
    /// `raw_url` wins over `provider`; a package with neither inherits the
    /// run-level provider.
    pub fn to_package(&self, http: &HttpClient) -> ConfigResult<Package> {
        let mut package = Package::new(&self.name);
        package.version = self.version.clone().filter(|v| !v.is_empty());
        package.include = self.include.clone();
        package.alias = self.alias.clone();

        if let Some(url) = self.raw_url.as_deref() {
            package.provider = Some(std::sync::Arc::new(Raw::new(url)));
        } else if let Some(name) = self.provider.as_deref().filter(|p| !p.is_empty()) {
            package.provider = Some(ProviderKind::from_str(name)?.build(http.clone()));
        }

        Ok(package)
    }
}

impl ImportmapToml {
    /// Configuration written by `importmap init`
    pub fn starter() -> Self {
        Self {
            settings: SettingsSection {
                provider: Some(ProviderKind::default().to_string()),
                cache_dir: Some(Utf8PathBuf::from(".importmap")),
                assets_dir: Some(Utf8PathBuf::from("assets")),
                shim_path: Some(DEFAULT_SHIM_PATH.to_string()),
                include_shim: Some(true),
                ..SettingsSection::default()
            },
            packages: vec![PackageSpec {
                name: "htmx".to_string(),
                version: Some("1.9.10".to_string()),
                ..PackageSpec::default()
            }],
        }
    }

    /// Runtime package requests in declaration order
    pub fn to_packages(&self, http: &HttpClient) -> ConfigResult<Vec<Package>> {
        self.packages.iter().map(|spec| spec.to_package(http)).collect()
    }
}

/// Parse TOML string to ImportmapToml configuration
pub fn parse_importmap_toml(content: &str) -> ConfigResult<ImportmapToml> {
    let config: ImportmapToml = ::toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(content, span.start))
            .unwrap_or((0, 0));
        ImportmapError::TomlParse {
            message: e.message().to_string(),
            line,
            column,
        }
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize ImportmapToml to TOML string
pub fn serialize_importmap_toml(config: &ImportmapToml) -> ConfigResult<String> {
    ::toml::to_string_pretty(config).map_err(|e| ImportmapError::TomlParse {
        message: format!("TOML serialization error: {}", e),
        line: 0,
        column: 0,
    })
}

/// Validate configuration completeness
pub fn validate_config(config: &ImportmapToml) -> ConfigResult<()> {
    config.settings.provider_kind()?;

    for (index, spec) in config.packages.iter().enumerate() {
        validate_package_spec(index, spec)?;
    }

    Ok(())
}

/// Load and parse importmap.toml from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<ImportmapToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ImportmapError::io(format!("Failed to read {}", path), e))?;

    parse_importmap_toml(&content).map_err(|e| match e {
        ImportmapError::TomlParse { message, line, column } => ImportmapError::TomlParse {
            message: format!("{} (in {})", message, path),
            line,
            column,
        },
        other => other,
    })
}

fn validate_package_spec(index: usize, spec: &PackageSpec) -> ConfigResult<()> {
    let field = |name: &str| format!("packages[{}].{}", index, name);

    if !is_valid_package_name(&spec.name) {
        return Err(ImportmapError::ConfigValidation {
            field: field("name"),
            reason: format!("'{}' is not a valid package name", spec.name),
        });
    }

    if let Some(provider) = spec.provider.as_deref().filter(|p| !p.is_empty()) {
        ProviderKind::from_str(provider)?;
    }

    if spec.raw_url.as_deref().is_some_and(str::is_empty) {
        return Err(ImportmapError::EmptyRawUrl {
            package: spec.name.clone(),
        });
    }

    for include in &spec.include {
        if include.file.is_empty() && !include.is_raw() {
            return Err(ImportmapError::ConfigValidation {
                field: field("include"),
                reason: "each include needs either 'file' or 'raw'".to_string(),
            });
        }
    }

    Ok(())
}

/// Check if a package name is valid (npm-compatible)
fn is_valid_package_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 214 {
        return false;
    }

    if !name.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '@') {
        return false;
    }

    name.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '@'))
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}
