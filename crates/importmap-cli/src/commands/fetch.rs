//! `importmap fetch` command implementation.

use std::collections::HashMap;

use importmap_assembler::ImportMap;
use importmap_core::error::ImportmapResult;
use importmap_registry::HttpClient;

use super::{CommandContext, LoadedConfig};

/// Execute the `importmap fetch` command
pub async fn execute(json: bool, clean: bool, ctx: &CommandContext) -> ImportmapResult<()> {
    let mut overrides = HashMap::new();
    if clean {
        overrides.insert("clean".to_string(), "true".to_string());
    }

    let loaded = ctx.load_config(&overrides).await?;
    let output = assemble(&loaded, json).await?;

    ctx.output.print(&output);
    Ok(())
}

/// Run the configured packages and render the result
pub async fn assemble(loaded: &LoadedConfig, json: bool) -> ImportmapResult<String> {
    let http = HttpClient::new()?;
    let settings = &loaded.config.settings;

    let provider = settings.provider_kind()?.build(http.clone());
    let packages = loaded.config.to_packages(&http)?;

    let mut map = ImportMap::new(provider, loaded.options(), packages, http);
    map.fetch().await?;

    if json {
        map.marshal()
    } else {
        map.render()
    }
}
