//! Tool trait — the abstraction over agent capabilities.
//!
//! The set of tools is closed: every capability is a [`ToolKind`]. The model
//! names tools by string, and that string is resolved to a kind exactly once,
//! at dispatch time, by [`ToolRegistry::lookup`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::step::ToolInput;

/// Every tool the host knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    CreateFile,
    ListFiles,
    ReadFile,
    WriteFile,
    GenerateCode,
    ExecuteCommand,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::CreateFile,
        ToolKind::ListFiles,
        ToolKind::ReadFile,
        ToolKind::WriteFile,
        ToolKind::GenerateCode,
        ToolKind::ExecuteCommand,
    ];

    /// The name the model uses in `tool_name`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateFile => "create_file",
            Self::ListFiles => "list_files",
            Self::ReadFile => "read_file",
            Self::WriteFile => "write_file",
            Self::GenerateCode => "generate_code",
            Self::ExecuteCommand => "execute_command",
        }
    }

    /// Leading text of a failure observation for this tool.
    pub fn error_prefix(&self) -> &'static str {
        match self {
            Self::CreateFile => "Error creating file",
            Self::ListFiles => "Error listing files",
            Self::ReadFile => "Error reading file",
            Self::WriteFile => "Error writing file",
            Self::GenerateCode => "Error generating code",
            Self::ExecuteCommand => "Error",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// A tool description rendered into the system prompt's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The result of one tool invocation.
///
/// `output` is what the model sees. `failure` keeps the structured error
/// for callers and tests; it never crosses the model boundary.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub tool: ToolKind,
    pub output: String,
    pub failure: Option<ToolError>,
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// The core Tool trait.
///
/// `execute` may fail; the registry turns any failure into observation
/// text, so implementations just return `Err` with a descriptive error.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Which tool this is.
    fn kind(&self) -> ToolKind;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, input: &ToolInput) -> std::result::Result<String, ToolError>;

    /// Convert this tool into a ToolDefinition for the prompt catalog.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.kind().name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Fetch a required string argument.
pub fn required_str<'a>(
    tool: ToolKind,
    input: &'a ToolInput,
    key: &str,
) -> std::result::Result<&'a str, ToolError> {
    match input.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(other) => Err(ToolError::InvalidInput {
            tool,
            reason: format!("'{key}' must be a string, got {other}"),
        }),
        None => Err(ToolError::InvalidInput {
            tool,
            reason: format!("missing '{key}' argument"),
        }),
    }
}

/// Fetch an optional string argument. `null` counts as absent.
pub fn optional_str<'a>(
    tool: ToolKind,
    input: &'a ToolInput,
    key: &str,
) -> std::result::Result<Option<&'a str>, ToolError> {
    match input.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(_) => required_str(tool, input, key).map(Some),
    }
}

/// The read-only set of tools available to the loop.
pub struct ToolRegistry {
    tools: HashMap<ToolKind, Box<dyn Tool>>,
    timeout: Option<Duration>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            timeout: None,
        }
    }

    /// Bound every invocation by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Register a tool. Replaces any existing tool of the same kind.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.kind(), tool);
    }

    /// Get a tool by kind.
    pub fn get(&self, kind: ToolKind) -> Option<&dyn Tool> {
        self.tools.get(&kind).map(|t| t.as_ref())
    }

    /// Resolve a model-supplied tool name.
    pub fn lookup(&self, name: &str) -> std::result::Result<&dyn Tool, ToolError> {
        let kind: ToolKind = name.parse()?;
        self.get(kind)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Registered kinds, in catalog order.
    pub fn kinds(&self) -> Vec<ToolKind> {
        ToolKind::ALL
            .into_iter()
            .filter(|k| self.tools.contains_key(k))
            .collect()
    }

    /// Get all tool definitions, in catalog order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.kinds()
            .into_iter()
            .filter_map(|k| self.get(k))
            .map(|t| t.to_definition())
            .collect()
    }

    /// Run a tool. Always yields text; failures are rendered, not raised.
    pub async fn invoke(&self, tool: &dyn Tool, input: &ToolInput) -> ToolOutcome {
        let kind = tool.kind();
        let start = Instant::now();

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, tool.execute(input)).await {
                Ok(result) => result,
                Err(_) => Err(ToolError::Timeout {
                    tool: kind,
                    timeout_secs: limit.as_secs(),
                }),
            },
            None => tool.execute(input).await,
        };

        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                debug!(tool = %kind, duration_ms, "Tool succeeded");
                ToolOutcome {
                    tool: kind,
                    output,
                    failure: None,
                }
            }
            Err(e) => {
                warn!(tool = %kind, duration_ms, error = %e, "Tool failed");
                ToolOutcome {
                    tool: kind,
                    output: format!("{}: {e}", kind.error_prefix()),
                    failure: Some(e),
                }
            }
        }
    }

    /// Look up a tool by name and run it.
    pub async fn dispatch(
        &self,
        name: &str,
        input: &ToolInput,
    ) -> std::result::Result<ToolOutcome, ToolError> {
        let tool = self.lookup(name)?;
        Ok(self.invoke(tool, input).await)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
