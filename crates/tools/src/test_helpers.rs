//! Scripted provider shared by the tool tests.

use std::sync::Mutex;

use async_trait::async_trait;
use relayclaw_core::error::ProviderError;
use relayclaw_core::message::ContentBlock;
use relayclaw_core::provider::{Provider, ProviderRequest, ProviderResponse, StopReason};

/// Replays canned outcomes in order and records every request.
pub struct ScriptedProvider {
    outcomes: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            outcomes: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcomes: Mutex::new(vec![Err(error)]),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: &str) -> ProviderResponse {
        Self::blocks(vec![ContentBlock::text(text)])
    }

    pub fn blocks(content: Vec<ContentBlock>) -> ProviderResponse {
        ProviderResponse {
            id: "msg_test".into(),
            model: "mock-model".into(),
            stop_reason: Some(StopReason::EndTurn),
            content,
            usage: None,
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            panic!("ScriptedProvider: no more responses");
        }
        outcomes.remove(0)
    }
}
