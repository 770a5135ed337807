//! The agent reasoning loop implementation.

use std::sync::Arc;
use std::time::Duration;

use relayclaw_core::message::{ContentBlock, Conversation, Message, Role};
use relayclaw_core::provider::{Provider, ProviderRequest, ProviderResponse, StopReason};
use relayclaw_core::tool::{ToolCall, ToolRegistry};
use tracing::{debug, info, warn};

use crate::interrupt::Interrupt;
use crate::turn::{CANCELLED_REPLY, EMPTY_RESPONSE_REPLY, TurnEvent, TurnResult};

pub const DEFAULT_MAX_ITERATIONS: u32 = 5;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

type EventHandler = Box<dyn Fn(&TurnEvent<'_>) + Send + Sync>;

/// Drives one user turn through model calls and tool executions.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// Max tokens per model response
    max_tokens: u32,

    /// Maximum model calls per turn
    max_iterations: u32,

    system_prompt: Option<String>,

    /// Upper bound on a single model call
    call_timeout: Duration,

    interrupt: Interrupt,

    on_event: Option<EventHandler>,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            model: model.into(),
            tools,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            system_prompt: None,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            interrupt: Interrupt::new(),
            on_event: None,
        }
    }

    /// Set the maximum number of model calls per turn.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Share an interrupt flag with the caller.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Observe assistant text and tool activity as the turn runs.
    pub fn on_event(mut self, handler: impl Fn(&TurnEvent<'_>) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Box::new(handler));
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    fn emit(&self, event: TurnEvent<'_>) {
        if let Some(handler) = &self.on_event {
            handler(&event);
        }
    }

    /// Resolve the pending user message in `conversation`.
    ///
    /// The conversation must end with a user message. Every outcome leaves
    /// history ending with an assistant message, so the caller can append
    /// the next user message directly.
    pub async fn run_turn(&self, conversation: &mut Conversation) -> TurnResult {
        match conversation.last() {
            Some(m) if m.role == Role::User => {}
            _ => {
                warn!(conversation_id = %conversation.id, "run_turn called without a pending user message");
                return TurnResult::Failed("conversation does not end with a user message".into());
            }
        }

        info!(
            conversation_id = %conversation.id,
            messages = conversation.len(),
            "Processing turn"
        );

        let tool_definitions = self.tools.schemas();
        let mut partial: Option<String> = None;

        for iteration in 1..=self.max_iterations {
            if self.interrupt.is_raised() {
                info!(conversation_id = %conversation.id, iteration, "Turn interrupted");
                conversation.push(Message::assistant(CANCELLED_REPLY));
                return TurnResult::Cancelled;
            }

            debug!(
                conversation_id = %conversation.id,
                iteration,
                "Agent loop iteration"
            );

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: conversation.messages().to_vec(),
                system: self.system_prompt.clone(),
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
                temperature: None,
            };

            let response = match self.call_model(request).await {
                Ok(response) => response,
                Err(reason) => {
                    warn!(conversation_id = %conversation.id, error = %reason, "Model call failed");
                    let result = TurnResult::Failed(reason);
                    conversation.push(Message::assistant(result.text()));
                    return result;
                }
            };

            if let Some(usage) = &response.usage {
                debug!(
                    model = %response.model,
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "Model usage"
                );
            }

            let has_text = response
                .content
                .iter()
                .filter_map(ContentBlock::as_text)
                .any(|t| !t.trim().is_empty());
            let has_tool_calls = response.content.iter().any(ContentBlock::is_tool_call);

            if !has_text && !has_tool_calls {
                warn!(
                    conversation_id = %conversation.id,
                    stop_reason = ?response.stop_reason,
                    "Model returned no usable content"
                );
                conversation.push(Message::assistant(EMPTY_RESPONSE_REPLY));
                return TurnResult::EmptyResponse;
            }

            match (has_tool_calls, response.stop_reason) {
                (true, Some(StopReason::ToolUse))
                | (false, Some(StopReason::EndTurn | StopReason::StopSequence)) => {}
                (false, Some(StopReason::MaxTokens)) => {
                    info!(conversation_id = %conversation.id, "Response hit the output cap");
                }
                (_, other) => {
                    warn!(
                        conversation_id = %conversation.id,
                        stop_reason = ?other,
                        has_tool_calls,
                        "Stop reason disagrees with response content, following the content"
                    );
                }
            }

            for text in response.content.iter().filter_map(ContentBlock::as_text) {
                if !text.trim().is_empty() {
                    self.emit(TurnEvent::AssistantText(text));
                }
            }

            let assistant = Message::assistant_blocks(response.content);
            let text = assistant.text();
            let calls = tool_calls_of(&assistant);
            conversation.push(assistant);

            if calls.is_empty() {
                info!(conversation_id = %conversation.id, iteration, "Turn complete");
                return TurnResult::Success(text);
            }

            if !text.trim().is_empty() {
                partial = Some(text);
            }

            debug!(tool_count = calls.len(), "Executing tool calls");
            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                self.emit(TurnEvent::ToolCall {
                    name: &call.name,
                    input: &call.arguments,
                });

                let result = self.tools.execute(call).await;

                self.emit(TurnEvent::ToolResult {
                    name: &call.name,
                    output: &result.output,
                    success: result.success,
                });

                results.push(ContentBlock::ToolResult {
                    tool_call_id: result.call_id,
                    content: result.output,
                    is_error: !result.success,
                });
            }
            conversation.push(Message::tool_results(results));
        }

        warn!(
            conversation_id = %conversation.id,
            max_iterations = self.max_iterations,
            "Iteration budget exhausted"
        );
        let result = TurnResult::BudgetExceeded { partial };
        conversation.push(Message::assistant(result.text()));
        result
    }

    async fn call_model(&self, request: ProviderRequest) -> Result<ProviderResponse, String> {
        match tokio::time::timeout(self.call_timeout, self.provider.complete(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "model call timed out after {}s",
                self.call_timeout.as_secs_f64()
            )),
        }
    }
}

fn tool_calls_of(message: &Message) -> Vec<ToolCall> {
    message
        .tool_calls()
        .filter_map(|block| match block {
            ContentBlock::ToolCall { id, name, input } => Some(ToolCall {
                id: id.clone(),
                name: name.clone(),
                arguments: serde_json::Value::Object(input.clone()),
            }),
            _ => None,
        })
        .collect()
}
