//! Percentage tool: "what is P% of N".

use async_trait::async_trait;
use relayclaw_core::error::ToolError;
use relayclaw_core::tool::{ParamType, Tool, ToolParams, ToolSchema};
use serde::Deserialize;

use crate::format_number;

pub struct PercentageTool;

#[derive(Debug, Deserialize)]
struct PercentageInput {
    base_number: f64,
    percentage: f64,
}

#[async_trait]
impl Tool for PercentageTool {
    fn name(&self) -> &str {
        "calculate_percentage"
    }

    fn description(&self) -> &str {
        "Calculates a percentage of a given number. For example, 'What is 17% of 420?'."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::new()
            .required(
                "base_number",
                ParamType::Number,
                "The number to calculate the percentage of (e.g., 420).",
            )
            .required(
                "percentage",
                ParamType::Number,
                "The percentage to apply (e.g., 17 for 17%).",
            )
    }

    async fn execute(&self, params: ToolParams) -> Result<String, ToolError> {
        let input: PercentageInput = params.parse()?;
        Ok(format_number(percentage_of(input.base_number, input.percentage)))
    }
}

pub fn percentage_of(base_number: f64, percentage: f64) -> f64 {
    (percentage / 100.0) * base_number
}
