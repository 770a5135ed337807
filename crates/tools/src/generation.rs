//! Single-shot text generation for the delegating tools.
//!
//! A [`Generator`] issues one model request with no tools attached and
//! returns the first text block. It never loops.

use std::path::Path;
use std::sync::Arc;

use relayclaw_core::error::ProviderError;
use relayclaw_core::message::ContentBlock;
use relayclaw_core::provider::{Provider, ProviderRequest};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Sub-AI returned no content")]
    NoContent,

    #[error("Sub-AI did not return text in the expected format")]
    NotText,
}

/// Handle on a model used for nested generation calls.
#[derive(Clone)]
pub struct Generator {
    provider: Arc<dyn Provider>,
    model: String,
}

impl Generator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Send `prompt` as a single user message and return the reply text.
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        let request = ProviderRequest::single_prompt(&self.model, prompt, max_tokens);
        debug!(model = %self.model, max_tokens, "Issuing generation request");

        let response = self.provider.complete(request).await?;
        match response.content.first() {
            None => {
                warn!("Generation returned no content");
                Err(GenerationError::NoContent)
            }
            Some(ContentBlock::Text { text }) => Ok(text.clone()),
            Some(_) => {
                warn!("Generation returned a non-text block");
                Err(GenerationError::NotText)
            }
        }
    }
}

/// Remove a single surrounding markdown fence the model added anyway.
pub fn strip_code_fences(text: &str, language: &str) -> String {
    let opening = format!("```{language}\n");
    let mut body = text.strip_prefix(opening.as_str()).unwrap_or(text);
    body = body.strip_suffix("\n```").unwrap_or(body);
    body.trim().to_string()
}

/// Write `content` to `path`, creating parent directories first.
pub async fn write_output(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await
}
