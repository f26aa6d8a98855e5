//! list_files — list the entries of a directory.

use async_trait::async_trait;
use stepwright_core::error::ToolError;
use stepwright_core::step::ToolInput;
use stepwright_core::tool::{Tool, ToolKind, optional_str};

pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn kind(&self) -> ToolKind {
        ToolKind::ListFiles
    }

    fn description(&self) -> &str {
        "Lists all files in a given directory (defaults to the current directory)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "The directory to list"
                }
            }
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let directory = optional_str(self.kind(), input, "directory")?.unwrap_or(".");

        let mut entries = tokio::fs::read_dir(directory)
            .await
            .map_err(|e| ToolError::Io(e.to_string()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ToolError::Io(e.to_string()))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        Ok(names.join("\n"))
    }
}
