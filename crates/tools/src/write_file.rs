//! write_file — write text to a file, replacing its contents.

use async_trait::async_trait;
use stepwright_core::error::ToolError;
use stepwright_core::step::ToolInput;
use stepwright_core::tool::{Tool, ToolKind, required_str};

pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn kind(&self) -> ToolKind {
        ToolKind::WriteFile
    }

    fn description(&self) -> &str {
        "Writes content to a file. Creates the file if it doesn't exist, overwrites if it does."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to write to"
                },
                "content": {
                    "type": "string",
                    "description": "The content to write"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let path = required_str(self.kind(), input, "path")?;
        let content = required_str(self.kind(), input, "content")?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| ToolError::Io(e.to_string()))?;

        Ok(format!("Successfully wrote to {path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_file::ReadFileTool;
    use crate::test_support::args;

    #[test]
    fn tool_definition() {
        let schema = WriteFileTool.parameters_schema();
        assert_eq!(schema["required"], serde_json::json!(["path", "content"]));
        assert!(schema["properties"]["content"].is_object());
    }

    #[tokio::test]
    async fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let path_str = path.to_str().unwrap();

        let output = WriteFileTool
            .execute(&args(serde_json::json!({ "path": path_str, "content": "Hello from test!" })))
            .await
            .unwrap();
        assert_eq!(output, format!("Successfully wrote to {path_str}"));

        let read = ReadFileTool
            .execute(&args(serde_json::json!({ "path": path_str })))
            .await
            .unwrap();
        assert_eq!(read, "Hello from test!");
    }

    #[tokio::test]
    async fn repeated_writes_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("same.txt");
        let input = args(serde_json::json!({ "path": path.to_str().unwrap(), "content": "v1" }));

        let first = WriteFileTool.execute(&input).await.unwrap();
        let second = WriteFileTool.execute(&input).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v1");
    }

    #[tokio::test]
    async fn overwrite_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overwrite.txt");
        std::fs::write(&path, "old content that is longer").unwrap();

        WriteFileTool
            .execute(&args(serde_json::json!({ "path": path.to_str().unwrap(), "content": "new" })))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[tokio::test]
    async fn missing_content_argument() {
        let result = WriteFileTool
            .execute(&args(serde_json::json!({ "path": "x.txt" })))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidInput { .. })));
    }
}
