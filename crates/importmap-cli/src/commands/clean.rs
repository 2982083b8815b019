//! `importmap clean` command implementation.

use std::collections::HashMap;

use importmap_cache::Materializer;
use importmap_core::error::ImportmapResult;
use importmap_registry::HttpClient;

use super::{display_path, CommandContext};

/// Execute the `importmap clean` command
pub async fn execute(ctx: &CommandContext) -> ImportmapResult<()> {
    let loaded = ctx.load_config(&HashMap::new()).await?;
    let layout = loaded.options().layout();

    let roots: Vec<_> = [layout.cache_root(), layout.assets_root()]
        .into_iter()
        .flatten()
        .filter(|root| root.exists())
        .collect();

    if roots.is_empty() {
        ctx.output.info("Nothing to clean");
        return Ok(());
    }

    Materializer::new(HttpClient::new()?, layout).clean().await?;

    for root in &roots {
        ctx.output.success(&format!("Removed {}", display_path(ctx, root)));
    }
    Ok(())
}
