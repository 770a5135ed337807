//! LLM Provider implementations for RelayClaw.
//!
//! All providers implement the `relayclaw_core::Provider` trait.

pub mod anthropic;

pub use anthropic::AnthropicProvider;
