//! read_file — return the full text of a file.

use async_trait::async_trait;
use stepwright_core::error::ToolError;
use stepwright_core::step::ToolInput;
use stepwright_core::tool::{Tool, ToolKind, required_str};

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn kind(&self) -> ToolKind {
        ToolKind::ReadFile
    }

    fn description(&self) -> &str {
        "Reads the contents of a file."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to read"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let path = required_str(self.kind(), input, "path")?;
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ToolError::Io(e.to_string()))
    }
}
