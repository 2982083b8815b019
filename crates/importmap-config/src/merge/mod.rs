//! Configuration discovery, layering, and environment overrides
//!
//! Precedence, lowest first: global `~/.importmap/config.toml`, the project
//! `importmap.toml`, `IMPORTMAP_*` environment variables, command-line flags.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use importmap_core::error::ImportmapError;

use crate::toml::{load_from_file, ImportmapToml, SettingsSection};
use crate::ConfigResult;

/// Project configuration file name
pub const CONFIG_FILE: &str = "importmap.toml";

const ENV_PREFIX: &str = "IMPORTMAP_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Directory the search for importmap.toml starts from
    cwd: Utf8PathBuf,
}

/// Where the project configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Explicit `--config` path
    Explicit(Utf8PathBuf),
    /// importmap.toml found in the working directory or an ancestor
    Project(Utf8PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Utf8Path {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Project(path) => path,
        }
    }

    /// Directory containing the configuration file
    pub fn dir(&self) -> Option<&Utf8Path> {
        self.path().parent()
    }
}

impl ConfigLoader {
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Load the project configuration, searching upward from `cwd`
    pub async fn load_project_config(&self) -> ConfigResult<(ImportmapToml, ConfigSource)> {
        let Some(path) = self.resolve_config_path(CONFIG_FILE) else {
            return Err(ImportmapError::ConfigValidation {
                field: "config".to_string(),
                reason: format!(
                    "No {} found in {} or its parent directories",
                    CONFIG_FILE, self.cwd
                ),
            });
        };

        debug!(path = %path, "loading project configuration");
        let config = load_from_file(&path).await?;
        Ok((config, ConfigSource::Project(path)))
    }

    /// Load the configuration at an explicit path
    pub async fn load_explicit(&self, path: &Utf8Path) -> ConfigResult<(ImportmapToml, ConfigSource)> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        };

        let config = load_from_file(&path).await?;
        Ok((config, ConfigSource::Explicit(path)))
    }

    /// Find `filename` in `cwd` or the nearest ancestor that has it
    pub fn resolve_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(filename))
            .find(|candidate| candidate.is_file())
    }

    /// Load global settings; a missing home directory or file yields `None`
    pub async fn load_global_config(&self) -> ConfigResult<Option<SettingsSection>> {
        let Some(path) = global_config_path() else {
            return Ok(None);
        };

        if !path.is_file() {
            return Ok(None);
        }

        debug!(path = %path, "loading global configuration");
        let config = load_from_file(&path).await?;
        Ok(Some(config.settings))
    }
}

/// `~/.importmap/config.toml`
pub fn global_config_path() -> Option<Utf8PathBuf> {
    let home = dirs::home_dir()?;
    let home = Utf8PathBuf::try_from(home).ok()?;
    Some(home.join(".importmap").join("config.toml"))
}

/// Configuration layering and merging
pub struct ConfigLayering;

impl ConfigLayering {
    /// Merge the configuration layers into the settings used for the run
    pub fn merge_configs(
        global_settings: Option<SettingsSection>,
        project_config: ImportmapToml,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<ImportmapToml> {
        let mut merged = project_config;

        if let Some(global) = global_settings {
            merged.settings = merged.settings.or(global);
        }

        for (key, value) in env_overrides {
            if let Some(field) = key.strip_prefix(ENV_PREFIX) {
                Self::apply_override(&mut merged.settings, &field.to_lowercase(), value)?;
            }
        }

        for (key, value) in cli_overrides {
            Self::apply_override(&mut merged.settings, key, value)?;
        }

        crate::toml::validate_config(&merged)?;
        Ok(merged)
    }

    fn apply_override(settings: &mut SettingsSection, field: &str, value: &str) -> ConfigResult<()> {
        match field {
            "provider" => settings.provider = Some(value.to_string()),
            "root_dir" => settings.root_dir = Some(Utf8PathBuf::from(value)),
            "cache_dir" => settings.cache_dir = Some(Utf8PathBuf::from(value)),
            "assets_dir" => settings.assets_dir = Some(Utf8PathBuf::from(value)),
            "shim_path" => settings.shim_path = Some(value.to_string()),
            "include_shim" => settings.include_shim = Some(parse_flag(field, value)?),
            "clean" => settings.clean = Some(parse_flag(field, value)?),
            _ => debug!(field, "ignoring unknown override"),
        }

        Ok(())
    }

    /// Collect `IMPORTMAP_*` environment variables
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_flag(field: &str, value: &str) -> ConfigResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ImportmapError::ConfigValidation {
            field: field.to_string(),
            reason: format!("expected a boolean, got '{}'", value),
        }),
    }
}
