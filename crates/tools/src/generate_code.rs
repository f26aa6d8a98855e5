//! generate_code — ask a secondary model for code and return the streamed text.

use async_trait::async_trait;
use std::sync::Arc;
use stepwright_core::error::ToolError;
use stepwright_core::message::Message;
use stepwright_core::provider::{Provider, ProviderRequest};
use stepwright_core::step::ToolInput;
use stepwright_core::tool::{Tool, ToolKind, required_str};
use tracing::debug;

/// Sends the prompt as a single user message and concatenates every
/// streamed fragment, in arrival order.
pub struct GenerateCodeTool {
    provider: Arc<dyn Provider>,
    model: String,
}

impl GenerateCodeTool {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Tool for GenerateCodeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::GenerateCode
    }

    fn description(&self) -> &str {
        "Generates code based on a prompt."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "What code to generate"
                }
            },
            "required": ["prompt"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let prompt = required_str(self.kind(), input, "prompt")?;

        let mut request = ProviderRequest::new(&self.model, vec![Message::user(prompt)]);
        request.stream = true;

        debug!(model = %self.model, "Generating code");

        let mut rx = self
            .provider
            .stream(request)
            .await
            .map_err(|e| ToolError::Generation(e.to_string()))?;

        let mut code = String::new();
        while let Some(chunk) = rx.recv().await {
            let chunk = chunk.map_err(|e| ToolError::Generation(e.to_string()))?;
            if let Some(fragment) = chunk.content {
                code.push_str(&fragment);
            }
            if chunk.done {
                break;
            }
        }

        Ok(code)
    }
}
