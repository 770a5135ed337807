//! Thinking-plan tool: asks a secondary model for a step-by-step plan,
//! optionally saving it to a file.

use std::path::Path;

use async_trait::async_trait;
use relayclaw_core::error::ToolError;
use relayclaw_core::tool::{ParamType, Tool, ToolParams, ToolSchema};
use serde::Deserialize;
use tracing::info;

use crate::generation::{Generator, write_output};

pub struct PlanningTool {
    generator: Generator,
    max_tokens: u32,
}

impl PlanningTool {
    pub fn new(generator: Generator, max_tokens: u32) -> Self {
        Self {
            generator,
            max_tokens,
        }
    }

    fn fail(&self, reason: impl Into<String>) -> ToolError {
        ToolError::ExecutionFailed {
            tool_name: self.name().into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlanInput {
    prompt_for_plan: String,
    #[serde(default)]
    output_file_path: Option<String>,
}

fn plan_prompt(request: &str) -> String {
    format!(
        "Please generate a clear, actionable, step-by-step thinking plan or strategy to address the following request.\n\
         The plan should be easy to follow. Use bullet points or numbered lists for clarity.\n\
         Only output the plan itself, with no other explanatory text or preamble unless it's part of the plan's introduction.\n\
         Request: {request}"
    )
}

#[async_trait]
impl Tool for PlanningTool {
    fn name(&self) -> &str {
        "create_thinking_plan"
    }

    fn description(&self) -> &str {
        "Generates a thinking plan or a list of steps to address a complex prompt. This tool will call another AI to generate the plan."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::new()
            .required(
                "prompt_for_plan",
                ParamType::String,
                "A detailed prompt describing the task or problem for which a thinking plan is needed.",
            )
            .optional(
                "output_file_path",
                ParamType::String,
                "Optional. If provided, the generated plan will be saved to this file path. E.g., 'output/my_plan.txt'.",
            )
    }

    async fn execute(&self, params: ToolParams) -> Result<String, ToolError> {
        let input: PlanInput = params.parse()?;
        info!(save = input.output_file_path.is_some(), "Generating plan");

        let plan = self
            .generator
            .generate(&plan_prompt(&input.prompt_for_plan), self.max_tokens)
            .await
            .map_err(|e| self.fail(format!("Plan generation failed: {e}")))?
            .trim()
            .to_string();

        if plan.is_empty() {
            return Err(self.fail("Generated plan was empty"));
        }

        match input.output_file_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => {
                write_output(Path::new(path), &plan)
                    .await
                    .map_err(|e| self.fail(format!("Failed to write {path}: {e}")))?;
                Ok(format!(
                    "Successfully generated plan and saved to {path}. Plan:\n{plan}"
                ))
            }
            _ => Ok(format!("Generated Plan:\n{plan}")),
        }
    }
}
