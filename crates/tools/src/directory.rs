//! Directory creation tool.

use async_trait::async_trait;
use relayclaw_core::error::ToolError;
use relayclaw_core::tool::{ParamType, Tool, ToolParams, ToolSchema};
use serde::Deserialize;
use tracing::info;

pub struct CreateDirectoryTool;

#[derive(Debug, Deserialize)]
struct DirectoryInput {
    directory_path: String,
}

#[async_trait]
impl Tool for CreateDirectoryTool {
    fn name(&self) -> &str {
        "create_directory"
    }

    fn description(&self) -> &str {
        "Creates a new directory at the specified path. If intermediate directories do not exist, they will also be created."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::new().required(
            "directory_path",
            ParamType::String,
            "The full path of the directory to create. E.g., 'path/to/my_new_directory'.",
        )
    }

    async fn execute(&self, params: ToolParams) -> Result<String, ToolError> {
        let input: DirectoryInput = params.parse()?;
        let path = input.directory_path.trim();
        if path.is_empty() {
            return Err(ToolError::InvalidInput {
                tool_name: self.name().into(),
                reason: "directory_path must not be empty".into(),
            });
        }

        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("Failed to create directory {path}: {e}"),
            })?;

        info!(path = %path, "Created directory");
        Ok(format!(
            "Successfully created directory (or it already existed): {path}"
        ))
    }
}
