//! Time duration conversion, using seconds as the common base.

use async_trait::async_trait;
use relayclaw_core::error::ToolError;
use relayclaw_core::tool::{ParamType, Tool, ToolParams, ToolSchema};
use serde::Deserialize;

use crate::format_number;

const UNITS: [&str; 4] = ["seconds", "minutes", "hours", "days"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn seconds(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
            Self::Days => 86400.0,
        }
    }
}

pub struct TimeConversionTool;

#[derive(Debug, Deserialize)]
struct TimeInput {
    value: f64,
    from_unit: TimeUnit,
    to_unit: TimeUnit,
}

#[async_trait]
impl Tool for TimeConversionTool {
    fn name(&self) -> &str {
        "convert_time"
    }

    fn description(&self) -> &str {
        "Converts time durations between seconds, minutes, hours, and days."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::new()
            .required("value", ParamType::Number, "The time value to convert.")
            .required_enum("from_unit", &UNITS, "The unit to convert from.")
            .required_enum("to_unit", &UNITS, "The unit to convert to.")
    }

    async fn execute(&self, params: ToolParams) -> Result<String, ToolError> {
        let input: TimeInput = params.parse()?;
        Ok(format_number(convert_time(input.value, input.from_unit, input.to_unit)))
    }
}

pub fn convert_time(value: f64, from: TimeUnit, to: TimeUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.seconds() / to.seconds()
}
