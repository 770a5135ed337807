//! Built-in tool implementations for RelayClaw.
//!
//! Arithmetic and unit conversions are pure functions wrapped as tools.
//! `create_directory` touches the filesystem. `create_html_file` and
//! `create_thinking_plan` delegate to a second single-shot model call
//! through [`generation::Generator`].

pub mod calculator;
pub mod directory;
pub mod generation;
pub mod html_generator;
pub mod percentage;
pub mod planning;
pub mod temperature;
pub mod time_conversion;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use relayclaw_config::SubtaskConfig;
use relayclaw_core::error::RegistryError;
use relayclaw_core::provider::Provider;
use relayclaw_core::tool::ToolRegistry;

pub use generation::{GenerationError, Generator};

/// Create a tool registry with every built-in tool.
///
/// `provider` backs the generation tools; it is usually the same client the
/// agent loop talks to.
pub fn default_registry(
    provider: Arc<dyn Provider>,
    subtask: &SubtaskConfig,
) -> Result<ToolRegistry, RegistryError> {
    let generator = Generator::new(provider, subtask.model.clone());

    let mut registry = ToolRegistry::new();
    registry.register(Box::new(calculator::CalculatorTool))?;
    registry.register(Box::new(percentage::PercentageTool))?;
    registry.register(Box::new(temperature::TemperatureConversionTool))?;
    registry.register(Box::new(time_conversion::TimeConversionTool))?;
    registry.register(Box::new(directory::CreateDirectoryTool))?;
    registry.register(Box::new(html_generator::HtmlGeneratorTool::new(
        generator.clone(),
        subtask.html_max_tokens,
    )))?;
    registry.register(Box::new(planning::PlanningTool::new(
        generator,
        subtask.plan_max_tokens,
    )))?;
    Ok(registry)
}

/// Render a numeric result for the model.
///
/// Whole numbers print without a fractional part; everything else uses the
/// shortest representation that round-trips.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
