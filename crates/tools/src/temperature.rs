//! Temperature conversion between Celsius and Fahrenheit.

use async_trait::async_trait;
use relayclaw_core::error::ToolError;
use relayclaw_core::tool::{ParamType, Tool, ToolParams, ToolSchema};
use serde::Deserialize;

use crate::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TemperatureUnit {
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

pub struct TemperatureConversionTool;

#[derive(Debug, Deserialize)]
struct TemperatureInput {
    value: f64,
    from_unit: TemperatureUnit,
    to_unit: TemperatureUnit,
}

#[async_trait]
impl Tool for TemperatureConversionTool {
    fn name(&self) -> &str {
        "convert_temperature"
    }

    fn description(&self) -> &str {
        "Converts temperatures between Celsius (C) and Fahrenheit (F)."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::new()
            .required("value", ParamType::Number, "The temperature value to convert.")
            .required_enum(
                "from_unit",
                &["C", "F"],
                "The unit to convert from (Celsius or Fahrenheit).",
            )
            .required_enum(
                "to_unit",
                &["C", "F"],
                "The unit to convert to (Celsius or Fahrenheit).",
            )
    }

    async fn execute(&self, params: ToolParams) -> Result<String, ToolError> {
        let input: TemperatureInput = params.parse()?;
        Ok(format_number(convert_temperature(
            input.value,
            input.from_unit,
            input.to_unit,
        )))
    }
}

pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    use TemperatureUnit::*;
    match (from, to) {
        (Celsius, Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (Fahrenheit, Celsius) => (value - 32.0) * 5.0 / 9.0,
        (Celsius, Celsius) | (Fahrenheit, Fahrenheit) => value,
    }
}
