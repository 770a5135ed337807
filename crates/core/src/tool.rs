//! Tool trait: the abstraction over agent capabilities.
//!
//! A tool is a named function the model may ask the host to run. Each tool
//! declares a [`ToolSchema`]; the [`ToolRegistry`] validates the model's raw
//! arguments against it before the tool ever sees them, and turns every
//! outcome (including failures) into text for the model.

use async_trait::async_trait;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, ToolError};
use crate::provider::ToolDefinition;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the model's tool call id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Raw arguments as produced by the model
    pub arguments: Value,
}

/// The wire-facing result of a tool call. Always textual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content, or `"Error: ..."` on failure
    pub output: String,
}

// ── Declarative input schema ──────────────────────────────────────────────

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Number,
    Integer,
    String,
    Boolean,
}

impl ParamType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// One named parameter of a tool.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
    /// Allowed string values. Empty means unrestricted.
    pub allowed: Vec<String>,
}

/// Declarative description of a tool's named parameters.
///
/// ```
/// use relayclaw_core::tool::{ParamType, ToolSchema};
///
/// let schema = ToolSchema::new()
///     .required("value", ParamType::Number, "The temperature value to convert.")
///     .required_enum("from_unit", &["C", "F"], "The unit to convert from.");
/// assert_eq!(schema.to_json()["required"][1], "from_unit");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ToolSchema {
    params: Vec<ParamSpec>,
}

impl ToolSchema {
    pub fn new() -> Self {
        Self::default()
    }

    fn param(mut self, name: &str, param_type: ParamType, description: &str, required: bool) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required,
            allowed: Vec::new(),
        });
        self
    }

    /// Add a required parameter.
    pub fn required(self, name: &str, param_type: ParamType, description: &str) -> Self {
        self.param(name, param_type, description, true)
    }

    /// Add an optional parameter.
    pub fn optional(self, name: &str, param_type: ParamType, description: &str) -> Self {
        self.param(name, param_type, description, false)
    }

    /// Add a required string parameter restricted to `allowed`.
    pub fn required_enum(mut self, name: &str, allowed: &[&str], description: &str) -> Self {
        self = self.param(name, ParamType::String, description, true);
        if let Some(last) = self.params.last_mut() {
            last.allowed = allowed.iter().map(|s| s.to_string()).collect();
        }
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Export as a JSON Schema object, the form the model expects.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for p in &self.params {
            let mut prop = serde_json::json!({
                "type": p.param_type.as_str(),
                "description": p.description,
            });
            if !p.allowed.is_empty() {
                prop["enum"] = serde_json::json!(p.allowed);
            }
            properties.insert(p.name.clone(), prop);
        }
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check raw arguments against the declared parameters.
    ///
    /// Unknown fields are ignored. An explicit `null` counts as absent and is
    /// dropped from the returned map.
    pub fn validate(&self, arguments: &Value) -> Result<Map<String, Value>, String> {
        let empty = Map::new();
        let obj = match arguments {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => return Err(format!("expected a JSON object, got {}", json_kind(other))),
        };

        for p in &self.params {
            match obj.get(&p.name) {
                None | Some(Value::Null) => {
                    if p.required {
                        return Err(format!("missing required field '{}'", p.name));
                    }
                }
                Some(value) => {
                    if !p.param_type.accepts(value) {
                        return Err(format!(
                            "field '{}' must be a {}, got {}",
                            p.name,
                            p.param_type.as_str(),
                            json_kind(value)
                        ));
                    }
                    if !p.allowed.is_empty() {
                        let s = value.as_str().unwrap_or_default();
                        if !p.allowed.iter().any(|a| a == s) {
                            return Err(format!(
                                "field '{}' must be one of [{}], got '{}'",
                                p.name,
                                p.allowed.join(", "),
                                s
                            ));
                        }
                    }
                }
            }
        }

        Ok(obj
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Arguments that passed schema validation.
#[derive(Debug, Clone)]
pub struct ToolParams {
    tool_name: String,
    values: Map<String, Value>,
}

impl ToolParams {
    pub fn new(tool_name: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            values,
        }
    }

    /// Deserialize into the tool's typed input struct.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ToolError> {
        serde_json::from_value(Value::Object(self.values)).map_err(|e| ToolError::InvalidInput {
            tool_name: self.tool_name,
            reason: e.to_string(),
        })
    }
}

// ── Tool trait ────────────────────────────────────────────────────────────

/// The core Tool trait.
///
/// Tools are constructed once at startup, registered into exactly one
/// [`ToolRegistry`], and never mutated afterwards.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "calculate").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// The parameters this tool accepts.
    fn input_schema(&self) -> ToolSchema;

    /// Run the tool on validated parameters. Returns the textual result.
    async fn execute(&self, params: ToolParams) -> Result<String, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema().to_json(),
        }
    }
}

/// A registry of available tools.
///
/// Duplicate names are rejected at registration. Definitions are exported in
/// registration order.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool under its name.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidDefinition {
                tool_name: name,
                reason: "tool name must not be empty".into(),
            });
        }
        if self.tools.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }

        let schema = tool.input_schema();
        let mut seen = std::collections::HashSet::new();
        for p in schema.params() {
            if !seen.insert(p.name.as_str()) {
                return Err(RegistryError::InvalidDefinition {
                    tool_name: name,
                    reason: format!("parameter '{}' declared more than once", p.name),
                });
            }
        }

        info!(tool = %name, "Registered tool");
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All tool definitions in registration order (for sending to the model).
    pub fn schemas(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|n| self.tools.get(n))
            .map(|t| t.to_definition())
            .collect()
    }

    /// Validate and run a tool by name.
    pub async fn dispatch(&self, name: &str, arguments: &Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let values = tool
            .input_schema()
            .validate(arguments)
            .map_err(|reason| ToolError::InvalidInput {
                tool_name: name.to_string(),
                reason,
            })?;

        debug!(tool = %name, "Dispatching tool");
        AssertUnwindSafe(tool.execute(ToolParams::new(name, values)))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(ToolError::ExecutionFailed {
                    tool_name: name.to_string(),
                    reason: format!("panicked: {}", panic_message(payload.as_ref())),
                })
            })
    }

    /// Execute a tool call, folding any failure into the textual result.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        match self.dispatch(&call.name, &call.arguments).await {
            Ok(output) => ToolResult {
                call_id: call.id.clone(),
                success: true,
                output,
            },
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                ToolResult {
                    call_id: call.id.clone(),
                    success: false,
                    output: format!("Error: {e}"),
                }
            }
        }
    }

    /// List all registered tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[derive(Deserialize)]
    struct EchoInput {
        text: String,
        #[serde(default)]
        shout: bool,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn input_schema(&self) -> ToolSchema {
            ToolSchema::new()
                .required("text", ParamType::String, "Text to echo")
                .optional("shout", ParamType::Boolean, "Uppercase the reply")
        }
        async fn execute(&self, params: ToolParams) -> Result<String, ToolError> {
            let input: EchoInput = params.parse()?;
            Ok(if input.shout {
                input.text.to_uppercase()
            } else {
                input.text
            })
        }
    }

    /// Always fails at execution time.
    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            "Fails every time"
        }
        fn input_schema(&self) -> ToolSchema {
            ToolSchema::new()
        }
        async fn execute(&self, _params: ToolParams) -> Result<String, ToolError> {
            Err(ToolError::ExecutionFailed {
                tool_name: "broken".into(),
                reason: "disk on fire".into(),
            })
        }
    }

    struct PanickingTool;

    #[async_trait]
    impl Tool for PanickingTool {
        fn name(&self) -> &str {
            "boom"
        }
        fn description(&self) -> &str {
            "Panics every time"
        }
        fn input_schema(&self) -> ToolSchema {
            ToolSchema::new()
        }
        async fn execute(&self, _params: ToolParams) -> Result<String, ToolError> {
            panic!("tool bug")
        }
    }

    struct DoubleParamTool;

    #[async_trait]
    impl Tool for DoubleParamTool {
        fn name(&self) -> &str {
            "double"
        }
        fn description(&self) -> &str {
            "Declares the same parameter twice"
        }
        fn input_schema(&self) -> ToolSchema {
            ToolSchema::new()
                .required("x", ParamType::Number, "first")
                .optional("x", ParamType::Number, "second")
        }
        async fn execute(&self, _params: ToolParams) -> Result<String, ToolError> {
            Ok(String::new())
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();
        registry.register(Box::new(BrokenTool)).unwrap();
        registry
    }

    #[test]
    fn registry_register_and_lookup() {
        let registry = registry();
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registry_rejects_duplicates() {
        let mut registry = registry();
        let err = registry.register(Box::new(EchoTool)).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("echo".into()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registry_rejects_repeated_parameter() {
        let mut registry = ToolRegistry::new();
        let err = registry.register(Box::new(DoubleParamTool)).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDefinition { .. }));
    }

    #[test]
    fn schemas_follow_registration_order() {
        let defs = registry().schemas();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "echo");
        assert_eq!(defs[1].name, "broken");
        assert_eq!(defs[0].input_schema["required"], serde_json::json!(["text"]));
        assert_eq!(defs[0].input_schema["properties"]["shout"]["type"], "boolean");
    }

    #[tokio::test]
    async fn dispatch_typed_parameters() {
        let out = registry()
            .dispatch("echo", &serde_json::json!({"text": "hello", "shout": true}))
            .await
            .unwrap();
        assert_eq!(out, "HELLO");
    }

    #[tokio::test]
    async fn dispatch_ignores_unknown_fields() {
        let out = registry()
            .dispatch("echo", &serde_json::json!({"text": "hi", "extra": 1}))
            .await
            .unwrap();
        assert_eq!(out, "hi");
    }

    #[tokio::test]
    async fn dispatch_unknown_tool() {
        let err = registry()
            .dispatch("nonexistent", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn dispatch_missing_required_field() {
        let err = registry()
            .dispatch("echo", &serde_json::json!({"shout": true}))
            .await
            .unwrap_err();
        match err {
            ToolError::InvalidInput { tool_name, reason } => {
                assert_eq!(tool_name, "echo");
                assert!(reason.contains("text"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_wrong_type() {
        let err = registry()
            .dispatch("echo", &serde_json::json!({"text": 42}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be a string"));
    }

    #[tokio::test]
    async fn execute_folds_errors_into_text() {
        let registry = registry();

        let missing = registry
            .execute(&ToolCall {
                id: "call_1".into(),
                name: "nonexistent".into(),
                arguments: serde_json::json!({}),
            })
            .await;
        assert!(!missing.success);
        assert_eq!(missing.call_id, "call_1");
        assert_eq!(missing.output, "Error: Tool 'nonexistent' not found");

        let invalid = registry
            .execute(&ToolCall {
                id: "call_2".into(),
                name: "echo".into(),
                arguments: serde_json::json!({}),
            })
            .await;
        assert!(!invalid.success);
        assert!(invalid.output.starts_with("Error: Invalid input for tool 'echo'"));

        let broken = registry
            .execute(&ToolCall {
                id: "call_3".into(),
                name: "broken".into(),
                arguments: serde_json::json!({}),
            })
            .await;
        assert!(!broken.success);
        assert!(broken.output.contains("disk on fire"));
    }

    #[tokio::test]
    async fn execute_turns_panics_into_error_text() {
        let mut registry = registry();
        registry.register(Box::new(PanickingTool)).unwrap();

        let result = registry
            .execute(&ToolCall {
                id: "call_9".into(),
                name: "boom".into(),
                arguments: serde_json::json!({}),
            })
            .await;
        assert!(!result.success);
        assert_eq!(result.call_id, "call_9");
        assert_eq!(result.output, "Error: Tool 'boom' failed: panicked: tool bug");

        // The registry stays usable afterwards.
        let out = registry
            .dispatch("echo", &serde_json::json!({"text": "still here"}))
            .await
            .unwrap();
        assert_eq!(out, "still here");
    }

    #[test]
    fn schema_validation_enum_and_shape() {
        let schema = ToolSchema::new().required_enum("unit", &["C", "F"], "unit");
        assert!(schema.validate(&serde_json::json!({"unit": "C"})).is_ok());
        let err = schema.validate(&serde_json::json!({"unit": "K"})).unwrap_err();
        assert!(err.contains("one of [C, F]"));
        let err = schema.validate(&serde_json::json!([1, 2])).unwrap_err();
        assert!(err.contains("expected a JSON object"));
    }

    #[test]
    fn schema_integer_rejects_fractions() {
        let schema = ToolSchema::new().required("n", ParamType::Integer, "count");
        assert!(schema.validate(&serde_json::json!({"n": 3})).is_ok());
        assert!(schema.validate(&serde_json::json!({"n": 3.5})).is_err());
    }
}
