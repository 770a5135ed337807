//! Shared test utilities for the agent loop.

use std::sync::Mutex;
use std::time::Duration;

use relayclaw_core::error::ProviderError;
use relayclaw_core::message::ContentBlock;
use relayclaw_core::provider::{Provider, ProviderRequest, ProviderResponse, StopReason};

/// A mock provider that replays outcomes in order and records each request.
pub struct ScriptedProvider {
    outcomes: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    hang: bool,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            outcomes: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
            hang: false,
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcomes: Mutex::new(vec![Err(error)]),
            requests: Mutex::new(Vec::new()),
            hang: false,
        }
    }

    /// Never answers within any sane timeout.
    pub fn hanging() -> Self {
        Self {
            outcomes: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            hang: true,
        }
    }

    pub fn blocks(content: Vec<ContentBlock>, stop_reason: Option<StopReason>) -> ProviderResponse {
        ProviderResponse {
            id: "msg_mock".into(),
            model: "mock-model".into(),
            stop_reason,
            content,
            usage: None,
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        if self.hang {
            tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
            return Err(ProviderError::Timeout("hung".into()));
        }
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            panic!("ScriptedProvider: no more responses");
        }
        outcomes.remove(0)
    }
}

/// A final text answer.
pub fn text_response(text: &str) -> ProviderResponse {
    ScriptedProvider::blocks(vec![ContentBlock::text(text)], Some(StopReason::EndTurn))
}

/// A response requesting the given `(id, name, input)` tool calls.
pub fn tool_response(calls: Vec<(&str, &str, serde_json::Value)>) -> ProviderResponse {
    let content = calls
        .into_iter()
        .map(|(id, name, input)| ContentBlock::ToolCall {
            id: id.into(),
            name: name.into(),
            input: input.as_object().cloned().unwrap_or_default(),
        })
        .collect();
    ScriptedProvider::blocks(content, Some(StopReason::ToolUse))
}
