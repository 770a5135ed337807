//! Calculator tool for one binary arithmetic operation.
//!
//! Takes two numbers and an operator (`+`, `-`, `*`, `/`). Division by zero
//! and unknown operators are reported back to the model as error text.

use async_trait::async_trait;
use relayclaw_core::error::ToolError;
use relayclaw_core::tool::{ParamType, Tool, ToolParams, ToolSchema};
use serde::Deserialize;

use crate::format_number;

pub struct CalculatorTool;

#[derive(Debug, Deserialize)]
struct CalculatorInput {
    num1: f64,
    num2: f64,
    operator: String,
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "A calculator for basic arithmetic operations: addition (+), subtraction (-), multiplication (*), and division (/)."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::new()
            .required("num1", ParamType::Number, "The first number.")
            .required("num2", ParamType::Number, "The second number.")
            .required(
                "operator",
                ParamType::String,
                "The operator to use, one of ['+', '-', '*', '/'].",
            )
    }

    async fn execute(&self, params: ToolParams) -> Result<String, ToolError> {
        let input: CalculatorInput = params.parse()?;
        calculate(input.num1, input.num2, &input.operator).map(format_number)
    }
}

/// Apply `operator` to the two operands.
pub fn calculate(num1: f64, num2: f64, operator: &str) -> Result<f64, ToolError> {
    match operator.trim() {
        "+" => Ok(num1 + num2),
        "-" => Ok(num1 - num2),
        "*" => Ok(num1 * num2),
        "/" => {
            if num2 == 0.0 {
                return Err(ToolError::Rejected("Division by zero".into()));
            }
            Ok(num1 / num2)
        }
        other => Err(ToolError::Rejected(format!(
            "Invalid operator '{other}', expected one of +, -, *, /"
        ))),
    }
}
