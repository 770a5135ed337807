//! Error types for the RelayClaw domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// Startup failures while assembling the agent from config, provider and tools.
///
/// Per-turn failures never surface here: tool errors become tool results and
/// model errors end the turn as a `TurnResult`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures while dispatching or running a tool.
///
/// These never escape the agent loop. The registry renders them as
/// `"Error: {self}"` and hands that string back to the model.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool '{0}' not found")]
    NotFound(String),

    #[error("Invalid input for tool '{tool_name}': {reason}")]
    InvalidInput { tool_name: String, reason: String },

    #[error("Tool '{tool_name}' failed: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    /// The input was well-formed but the operation is undefined for it
    /// (division by zero, unsupported operator).
    #[error("{0}")]
    Rejected(String),
}

/// Startup-time failures while building a [`crate::tool::ToolRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("A tool named '{0}' is already registered")]
    Duplicate(String),

    #[error("Invalid definition for tool '{tool_name}': {reason}")]
    InvalidDefinition { tool_name: String, reason: String },
}
