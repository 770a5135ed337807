//! End-to-end integration tests for the RelayClaw agent.
//!
//! These tests exercise the full pipeline from user input to agent output
//! with the real default tool registry and a scripted provider standing in
//! for the model.

use std::sync::{Arc, Mutex};

use relayclaw_agent::{AgentLoop, TurnResult};
use relayclaw_config::SubtaskConfig;
use relayclaw_core::error::ProviderError;
use relayclaw_core::message::{ContentBlock, Conversation, Message, Role};
use relayclaw_core::provider::{Provider, ProviderRequest, ProviderResponse, StopReason, Usage};
use relayclaw_tools::default_registry;
use serde_json::json;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted responses in sequence.
struct ScriptedProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let index = requests.len();
        if index >= responses.len() {
            panic!(
                "ScriptedProvider exhausted: call #{index}, have {}",
                responses.len()
            );
        }
        requests.push(request);
        Ok(responses[index].clone())
    }
}

fn response(content: Vec<ContentBlock>, stop_reason: StopReason) -> ProviderResponse {
    ProviderResponse {
        id: "msg_e2e".into(),
        model: "mock-model".into(),
        stop_reason: Some(stop_reason),
        content,
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

fn text_response(text: &str) -> ProviderResponse {
    response(vec![ContentBlock::text(text)], StopReason::EndTurn)
}

fn tool_use(id: &str, name: &str, input: serde_json::Value) -> ContentBlock {
    ContentBlock::ToolCall {
        id: id.into(),
        name: name.into(),
        input: input.as_object().cloned().unwrap_or_default(),
    }
}

fn agent_for(provider: &Arc<ScriptedProvider>) -> AgentLoop {
    let tools = Arc::new(default_registry(provider.clone(), &SubtaskConfig::default()).unwrap());
    AgentLoop::new(provider.clone(), "claude-3-opus-20240229", tools)
}

fn ask(text: &str) -> Conversation {
    let mut conv = Conversation::new();
    conv.push(Message::user(text));
    conv
}

fn tool_results(message: &Message) -> Vec<(String, String)> {
    message
        .blocks()
        .iter()
        .filter_map(|b| match b {
            ContentBlock::ToolResult { tool_call_id, content, .. } => {
                Some((tool_call_id.clone(), content.clone()))
            }
            _ => None,
        })
        .collect()
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn percentage_question_end_to_end() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        response(
            vec![
                ContentBlock::text("I'll calculate that."),
                tool_use(
                    "toolu_01",
                    "calculate_percentage",
                    json!({"base_number": 420, "percentage": 17}),
                ),
            ],
            StopReason::ToolUse,
        ),
        text_response("17% of 420 is 71.4."),
    ]));
    let agent = agent_for(&provider);

    let mut conv = ask("What's 17% of 420?");
    let result = agent.run_turn(&mut conv).await;

    assert_eq!(result, TurnResult::Success("17% of 420 is 71.4.".into()));
    let roles: Vec<Role> = conv.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
    assert_eq!(
        tool_results(&conv.messages()[2]),
        vec![("toolu_01".to_string(), "71.4".to_string())]
    );

    // The assistant message is kept exactly as the model sent it.
    assert_eq!(conv.messages()[1].blocks().len(), 2);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn every_request_carries_all_tool_schemas() {
    let provider = Arc::new(ScriptedProvider::new(vec![text_response("Paris.")]));
    let agent = agent_for(&provider);

    let mut conv = ask("What is the capital of France?");
    agent.run_turn(&mut conv).await;

    let req = provider.request(0);
    let names: Vec<&str> = req.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "calculate",
            "calculate_percentage",
            "convert_temperature",
            "convert_time",
            "create_directory",
            "create_html_file",
            "create_thinking_plan",
        ]
    );
    let temperature = &req.tools[2].input_schema;
    assert_eq!(temperature["properties"]["from_unit"]["enum"], json!(["C", "F"]));
    assert_eq!(req.model, "claude-3-opus-20240229");
    assert_eq!(req.max_tokens, 2048);
}

#[tokio::test]
async fn chained_conversions_across_iterations() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        response(
            vec![tool_use(
                "t1",
                "convert_temperature",
                json!({"value": 100, "from_unit": "F", "to_unit": "C"}),
            )],
            StopReason::ToolUse,
        ),
        response(
            vec![tool_use(
                "t2",
                "convert_time",
                json!({"value": 3.5, "from_unit": "days", "to_unit": "seconds"}),
            )],
            StopReason::ToolUse,
        ),
        text_response("37.78°C, and 302400 seconds."),
    ]));
    let agent = agent_for(&provider);

    let mut conv = ask("Convert 100°F to Celsius, then tell me seconds in 3.5 days.");
    let result = agent.run_turn(&mut conv).await;

    assert!(result.is_success());
    assert_eq!(conv.len(), 6);
    assert_eq!(tool_results(&conv.messages()[2])[0].1, "37.77777777777778");
    assert_eq!(tool_results(&conv.messages()[4])[0].1, "302400");
    // The third call sees the whole chain.
    assert_eq!(provider.request(2).messages.len(), 5);
}

#[tokio::test]
async fn directory_and_plan_tools_touch_the_filesystem() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("projects").join("blog");
    let plan_path = dir.join("plan.md");

    let provider = Arc::new(ScriptedProvider::new(vec![
        response(
            vec![
                tool_use(
                    "d1",
                    "create_directory",
                    json!({"directory_path": dir.to_str().unwrap()}),
                ),
                tool_use(
                    "p1",
                    "create_thinking_plan",
                    json!({
                        "prompt_for_plan": "a blog post about remote work",
                        "output_file_path": plan_path.to_str().unwrap(),
                    }),
                ),
            ],
            StopReason::ToolUse,
        ),
        // Served to the planning tool's nested call
        text_response("1. Research\n2. Outline\n3. Write"),
        text_response("Directory created and plan saved."),
    ]));
    let agent = agent_for(&provider);

    let mut conv = ask("Set up a folder and plan my blog post.");
    let result = agent.run_turn(&mut conv).await;

    assert_eq!(result.text(), "Directory created and plan saved.");
    assert!(dir.is_dir());
    assert_eq!(
        std::fs::read_to_string(&plan_path).unwrap(),
        "1. Research\n2. Outline\n3. Write"
    );

    let results = tool_results(&conv.messages()[2]);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, "d1");
    assert!(results[0].1.starts_with("Successfully created directory"));
    assert_eq!(results[1].0, "p1");
    assert!(results[1].1.starts_with("Successfully generated plan and saved to"));

    // The nested call is single-shot and carries no tools.
    let nested = provider.request(1);
    assert!(nested.tools.is_empty());
    assert_eq!(nested.model, "claude-3-haiku-20240307");
    assert_eq!(nested.messages.len(), 1);
}

#[tokio::test]
async fn runaway_tool_use_hits_the_budget() {
    let responses = (0..5)
        .map(|i| {
            response(
                vec![tool_use(
                    &format!("c{i}"),
                    "calculate",
                    json!({"num1": i, "num2": 1, "operator": "+"}),
                )],
                StopReason::ToolUse,
            )
        })
        .collect();
    let provider = Arc::new(ScriptedProvider::new(responses));
    let agent = agent_for(&provider);

    let mut conv = ask("Count forever");
    let result = agent.run_turn(&mut conv).await;

    assert_eq!(result, TurnResult::BudgetExceeded { partial: None });
    assert_eq!(result.text(), "Sorry, I couldn't resolve that in a few steps.");
    assert_eq!(provider.calls(), 5);
    assert_eq!(conv.last().unwrap().role, Role::Assistant);
}

#[tokio::test]
async fn bad_tool_input_is_reported_to_the_model() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        response(
            vec![tool_use(
                "bad",
                "convert_temperature",
                json!({"value": "hot", "from_unit": "C", "to_unit": "K"}),
            )],
            StopReason::ToolUse,
        ),
        text_response("I need a numeric value."),
    ]));
    let agent = agent_for(&provider);

    let mut conv = ask("Convert hot to Kelvin");
    let result = agent.run_turn(&mut conv).await;

    assert!(result.is_success());
    let results = tool_results(&conv.messages()[2]);
    assert!(results[0].1.starts_with("Error: Invalid input for tool 'convert_temperature'"));
    assert!(results[0].1.contains("value"));
}
