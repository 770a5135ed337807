//! `relayclaw tools`: print the tool schemas as JSON.

use std::sync::Arc;

use relayclaw_config::AppConfig;
use relayclaw_providers::AnthropicProvider;

pub fn run() -> relayclaw_core::Result<()> {
    let config = super::load_config()?;
    println!("{}", schema_listing(&config)?);
    Ok(())
}

/// Pretty-printed definitions of every registered tool.
fn schema_listing(config: &AppConfig) -> relayclaw_core::Result<String> {
    // The generation tools hold a provider handle but listing never calls it,
    // so no key is needed here.
    let provider = Arc::new(AnthropicProvider::new(
        config.api_key.clone().unwrap_or_default(),
    )?);
    let registry = relayclaw_tools::default_registry(provider, &config.subtask)?;
    Ok(serde_json::to_string_pretty(&registry.schemas())?)
}
