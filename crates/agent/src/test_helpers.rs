//! Shared test helpers for loop tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use stepwright_core::error::{ProviderError, ToolError};
use stepwright_core::message::Message;
use stepwright_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use stepwright_core::step::ToolInput;
use stepwright_core::tool::{Tool, ToolKind};

/// A mock provider that replies with a fixed script, one entry per call.
///
/// Records the transcript length of every request. Returns an error once
/// the script is exhausted.
pub struct ScriptedProvider {
    replies: Mutex<Vec<String>>,
    seen: Mutex<Vec<usize>>,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Self {
        let mut replies: Vec<String> = replies.iter().map(|r| r.to_string()).collect();
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Transcript length sent with each request.
    pub fn request_sizes(&self) -> Vec<usize> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.seen.lock().unwrap().push(request.messages.len());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| ProviderError::NotConfigured("script exhausted".into()))?;

        Ok(ProviderResponse {
            message: Message::assistant(reply),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: request.model,
        })
    }
}

/// Records every input it receives, posing as `kind`.
pub struct RecordingTool {
    kind: ToolKind,
    reply: Result<String, ToolError>,
    calls: Arc<Mutex<Vec<ToolInput>>>,
}

impl RecordingTool {
    pub fn ok(kind: ToolKind, reply: &str) -> Self {
        Self {
            kind,
            reply: Ok(reply.into()),
            calls: Arc::default(),
        }
    }

    pub fn failing(kind: ToolKind, error: ToolError) -> Self {
        Self {
            kind,
            reply: Err(error),
            calls: Arc::default(),
        }
    }

    /// Handle to the recorded inputs, usable after the tool is registered.
    pub fn calls(&self) -> Arc<Mutex<Vec<ToolInput>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn kind(&self) -> ToolKind {
        self.kind
    }

    fn description(&self) -> &str {
        "records calls"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object" })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        self.calls.lock().unwrap().push(input.clone());
        self.reply.clone()
    }
}
