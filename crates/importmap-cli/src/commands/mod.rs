//! Command implementations and dispatch logic.
//!
//! Each command is implemented as an async function that takes a CommandContext.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use importmap_assembler::Options;
use importmap_config::{ConfigLayering, ConfigLoader, ConfigSource, ImportmapToml};
use importmap_core::error::{ImportmapError, ImportmapResult};

pub mod clean;
pub mod fetch;
pub mod init;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    /// Explicit `--config` path
    pub config: Option<Utf8PathBuf>,
    pub output: OutputHandler,
}

/// Configuration resolved for one command
pub struct LoadedConfig {
    pub config: ImportmapToml,
    pub source: ConfigSource,
}

impl LoadedConfig {
    /// Run options, with relative directories anchored at the config file
    pub fn options(&self) -> Options {
        self.config.settings.to_options(self.source.dir())
    }
}

impl CommandContext {
    pub fn new(config: Option<Utf8PathBuf>) -> ImportmapResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| ImportmapError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| ImportmapError::InvalidPath {
            path: e.into_path_buf().display().to_string(),
        })?;

        Ok(Self {
            cwd,
            config,
            output: OutputHandler::new(),
        })
    }

    /// Load and layer the configuration for this invocation
    pub async fn load_config(&self, cli_overrides: &HashMap<String, String>) -> ImportmapResult<LoadedConfig> {
        let loader = ConfigLoader::new(self.cwd.clone());

        let (project, source) = match self.config.as_deref() {
            Some(path) => loader.load_explicit(path).await?,
            None => loader.load_project_config().await?,
        };
        let global = loader.load_global_config().await?;
        let env = ConfigLayering::collect_env_overrides();

        let config = ConfigLayering::merge_configs(global, project, &env, cli_overrides)?;
        info!(path = %source.path(), packages = config.packages.len(), "configuration loaded");

        Ok(LoadedConfig { config, source })
    }

    pub fn config_target(&self) -> Utf8PathBuf {
        match self.config.as_deref() {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.cwd.join(path),
            None => self.cwd.join(importmap_config::CONFIG_FILE),
        }
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> ImportmapResult<()> {
    match command {
        Commands::Fetch { json, clean } => fetch::execute(json, clean, ctx).await,
        Commands::Clean => clean::execute(ctx).await,
        Commands::Init { force } => init::execute(force, ctx).await,
        Commands::Version => show_version(ctx),
    }
}

fn show_version(ctx: &CommandContext) -> ImportmapResult<()> {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.print(&format!("importmap v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.print(&format!("Built: {}", env!("BUILD_DATE")));
    ctx.output.print(&format!("Target: {}", target));
    ctx.output.print(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}

/// Display a path relative to the working directory when it is inside it
pub fn display_path<'a>(ctx: &CommandContext, path: &'a Utf8Path) -> &'a Utf8Path {
    path.strip_prefix(&ctx.cwd).unwrap_or(path)
}
