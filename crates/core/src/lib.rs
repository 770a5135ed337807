//! # RelayClaw Core
//!
//! Domain types, traits, and error definitions for the RelayClaw tool-calling
//! agent. This crate has **no framework dependencies**: it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is a trait here. Implementations live in their
//! respective crates, and the binary wires them together explicitly:
//! - The model backend is a [`Provider`]
//! - Capabilities are [`Tool`]s held by a [`ToolRegistry`]
//! - Conversation state is a plain [`Conversation`] owned by the caller

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, RegistryError, Result, ToolError};
pub use message::{ContentBlock, Conversation, ConversationId, Message, MessageContent, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StopReason, ToolDefinition, Usage};
pub use tool::{ParamType, Tool, ToolCall, ToolParams, ToolRegistry, ToolResult, ToolSchema};
