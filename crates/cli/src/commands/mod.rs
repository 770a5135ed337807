pub mod chat;
pub mod demo;
pub mod tools;

use std::sync::Arc;
use std::time::Duration;

use relayclaw_agent::{AgentLoop, TurnEvent};
use relayclaw_config::{AppConfig, ConfigError};
use relayclaw_core::Error;
use relayclaw_core::provider::Provider;
use relayclaw_providers::AnthropicProvider;

/// Load config, insist on a key, and wire provider, tools and loop together.
pub fn build_agent() -> relayclaw_core::Result<(AppConfig, AgentLoop)> {
    let config = load_config()?;

    if let Err(e) = config.require_api_key() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Set one of these environment variables (or put it in .env):");
        for var in relayclaw_config::API_KEY_ENV_VARS {
            eprintln!("    {var}=sk-ant-...");
        }
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err(config_error(e));
    }

    let provider: Arc<dyn Provider> = Arc::new(AnthropicProvider::from_config(&config)?);
    let tools = Arc::new(relayclaw_tools::default_registry(
        provider.clone(),
        &config.subtask,
    )?);

    let mut agent = AgentLoop::new(provider, &config.model, tools)
        .with_max_iterations(config.max_iterations)
        .with_max_tokens(config.max_tokens)
        .with_call_timeout(Duration::from_secs(config.request_timeout_secs))
        .on_event(print_event);
    if let Some(prompt) = &config.system_prompt {
        agent = agent.with_system_prompt(prompt);
    }

    Ok((config, agent))
}

fn load_config() -> relayclaw_core::Result<AppConfig> {
    AppConfig::load().map_err(config_error)
}

fn config_error(e: ConfigError) -> Error {
    Error::Config {
        message: e.to_string(),
    }
}

/// Show tool activity as it happens.
fn print_event(event: &TurnEvent<'_>) {
    match event {
        TurnEvent::AssistantText(_) => {}
        TurnEvent::ToolCall { name, input } => {
            println!("  Tool Used: {name}, Input: {input}");
        }
        TurnEvent::ToolResult { output, .. } => {
            println!("  Tool Result: {output}");
        }
    }
}
