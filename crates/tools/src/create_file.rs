//! create_file — create an empty file, truncating any existing one.

use async_trait::async_trait;
use stepwright_core::error::ToolError;
use stepwright_core::step::ToolInput;
use stepwright_core::tool::{Tool, ToolKind, required_str};

pub struct CreateFileTool;

#[async_trait]
impl Tool for CreateFileTool {
    fn kind(&self) -> ToolKind {
        ToolKind::CreateFile
    }

    fn description(&self) -> &str {
        "Creates an empty file at the given path. An existing file is truncated."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to create"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let path = required_str(self.kind(), input, "path")?;

        tokio::fs::write(path, b"")
            .await
            .map_err(|e| ToolError::Io(e.to_string()))?;

        Ok(format!("Successfully created file: {path}"))
    }
}
