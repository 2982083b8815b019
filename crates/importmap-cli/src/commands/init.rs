//! `importmap init` command implementation.
//!
//! Writes a starter importmap.toml that resolves htmx from cdnjs and
//! publishes it under `assets/`.

use importmap_config::toml::serialize_importmap_toml;
use importmap_config::ImportmapToml;
use importmap_core::error::{ImportmapError, ImportmapResult};

use super::{display_path, CommandContext};

/// Execute the `importmap init` command
pub async fn execute(force: bool, ctx: &CommandContext) -> ImportmapResult<()> {
    let target = ctx.config_target();

    if target.exists() && !force {
        ctx.output.info(&format!(
            "{} already exists, skipping initialization (use --force to overwrite)",
            display_path(ctx, &target)
        ));
        return Ok(());
    }

    let content = serialize_importmap_toml(&ImportmapToml::starter())?;

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ImportmapError::io(format!("Failed to create directory {}", parent), e))?;
    }
    tokio::fs::write(&target, content)
        .await
        .map_err(|e| ImportmapError::io(format!("Failed to write {}", target), e))?;

    ctx.output.success(&format!("Created {}", display_path(ctx, &target)));
    ctx.output.info("");
    ctx.output.info("Next steps:");
    ctx.output.info("  importmap fetch");

    Ok(())
}
