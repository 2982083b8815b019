//! # importmap
//!
//! Resolves JavaScript and CSS packages against public CDNs and prints a
//! browser import map for them.
//!
//! This is the main entry point for the CLI. It handles command parsing,
//! sets up logging and error handling, and dispatches to the command handlers.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use importmap_core::error::{ImportmapError, ImportmapResult};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Build browser import maps from CDN packages
#[derive(Parser)]
#[command(name = "importmap", version, about = "Build browser import maps from CDN packages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this configuration file instead of searching for importmap.toml
    #[arg(short, long, global = true, value_name = "FILE", env = "IMPORTMAP_CONFIG")]
    pub config: Option<Utf8PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve packages and print the import map
    Fetch {
        /// Print the full structure as JSON instead of HTML
        #[arg(long)]
        json: bool,
        /// Remove the cache and assets directories first
        #[arg(long)]
        clean: bool,
    },
    /// Remove the cache and assets directories
    Clean,
    /// Write a starter importmap.toml in the current directory
    Init {
        /// Overwrite an existing importmap.toml
        #[arg(long)]
        force: bool,
    },
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting importmap v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> ImportmapResult<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| ImportmapError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.config)?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "importmap={level},importmap_core={level},importmap_registry={level},\
             importmap_cache={level},importmap_config={level},importmap_assembler={level}"
        ))
    });

    // stdout carries the import map itself
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("importmap encountered an unexpected error: {}", panic_info);
        eprintln!("importmap crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/importmap-rs/importmap/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
