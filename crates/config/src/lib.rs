//! Configuration loading and validation for RelayClaw.
//!
//! Loads configuration from `~/.relayclaw/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_ENV_VARS: &[&str] = &["CLAUDE_API_KEY", "ANTHROPIC_API_KEY", "RELAYCLAW_API_KEY"];

/// The root configuration structure.
///
/// Maps directly to `~/.relayclaw/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Anthropic API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the Messages API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model driving the orchestration loop
    #[serde(default = "default_model")]
    pub model: String,

    /// Max output tokens per orchestration call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Model calls allowed per user turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Timeout for a single model call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional system prompt for every orchestration call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Settings for tools that make their own model call
    #[serde(default)]
    pub subtask: SubtaskConfig,
}

fn default_api_url() -> String {
    "https://api.anthropic.com".into()
}
fn default_model() -> String {
    "claude-3-opus-20240229".into()
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_max_iterations() -> u32 {
    5
}
fn default_request_timeout_secs() -> u64 {
    120
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("max_iterations", &self.max_iterations)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("system_prompt", &self.system_prompt)
            .field("subtask", &self.subtask)
            .finish()
    }
}

/// Nested single-shot generation (HTML pages, thinking plans).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtaskConfig {
    #[serde(default = "default_subtask_model")]
    pub model: String,

    #[serde(default = "default_html_max_tokens")]
    pub html_max_tokens: u32,

    #[serde(default = "default_plan_max_tokens")]
    pub plan_max_tokens: u32,
}

fn default_subtask_model() -> String {
    "claude-3-haiku-20240307".into()
}
fn default_html_max_tokens() -> u32 {
    4000
}
fn default_plan_max_tokens() -> u32 {
    2048
}

impl Default for SubtaskConfig {
    fn default() -> Self {
        Self {
            model: default_subtask_model(),
            html_max_tokens: default_html_max_tokens(),
            plan_max_tokens: default_plan_max_tokens(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location with environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (highest priority).
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()))
        {
            self.api_key = Some(key);
        }

        if let Some(model) = lookup("RELAYCLAW_MODEL") {
            self.model = model;
        }

        if let Some(url) = lookup("RELAYCLAW_API_URL") {
            self.api_url = url;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".relayclaw")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be at least 1".into(),
            ));
        }
        if self.max_tokens == 0 || self.subtask.html_max_tokens == 0 || self.subtask.plan_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "token limits must be greater than 0".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The API key, or a startup error naming where to put one.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            max_iterations: default_max_iterations(),
            request_timeout_secs: default_request_timeout_secs(),
            system_prompt: None,
            subtask: SubtaskConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key configured; set CLAUDE_API_KEY or add api_key to the config file")]
    MissingApiKey,
}
