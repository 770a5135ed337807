//! HTML generation tool. Asks a secondary model for a page and saves it.

use std::path::Path;

use async_trait::async_trait;
use relayclaw_core::error::ToolError;
use relayclaw_core::tool::{ParamType, Tool, ToolParams, ToolSchema};
use serde::Deserialize;
use tracing::info;

use crate::generation::{Generator, strip_code_fences, write_output};

pub struct HtmlGeneratorTool {
    generator: Generator,
    max_tokens: u32,
}

impl HtmlGeneratorTool {
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
struct HtmlInput {
    file_path: String,
    prompt_for_html: String,
}

fn html_prompt(request: &str) -> String {
    format!(
        "Please generate complete, well-formed HTML code based on the following request.\n\
         Only output the HTML code itself, with no other explanatory text, preamble, or markdown code fences.\n\
         Ensure all tags are properly closed and the structure is valid.\n\
         Include CSS within <style> tags in the <head> if styling is requested or implied by the prompt.\n\
         If JavaScript is needed for simple interactivity as per the prompt, include it within <script> tags at the end of the <body>.\n\
         Request: {request}"
    )
}

#[async_trait]
impl Tool for HtmlGeneratorTool {
    fn name(&self) -> &str {
        "create_html_file"
    }

    fn description(&self) -> &str {
        "Generates an HTML file based on a user prompt and saves it to the specified path. This tool will call another AI to generate the HTML content."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::new()
            .required(
                "file_path",
                ParamType::String,
                "The full path where the HTML file should be saved, e.g., 'output/my_page.html'.",
            )
            .required(
                "prompt_for_html",
                ParamType::String,
                "A detailed prompt describing the HTML content to be generated.",
            )
    }

    async fn execute(&self, params: ToolParams) -> Result<String, ToolError> {
        let input: HtmlInput = params.parse()?;
        info!(path = %input.file_path, "Generating HTML");

        let raw = self
            .generator
            .generate(&html_prompt(&input.prompt_for_html), self.max_tokens)
            .await
            .map_err(|e| self.fail(format!("HTML generation failed: {e}")))?;

        let html = strip_code_fences(&raw, "html");
        if html.is_empty() {
            return Err(self.fail("Generated HTML content was empty"));
        }

        write_output(Path::new(&input.file_path), &html)
            .await
            .map_err(|e| self.fail(format!("Failed to write {}: {e}", input.file_path)))?;

        Ok(format!(
            "Successfully generated HTML and saved to {}. Content length: {} bytes.",
            input.file_path,
            html.len()
        ))
    }
}
