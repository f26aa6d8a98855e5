//! execute_command — run a command line through the system shell.

use async_trait::async_trait;
use std::path::Path;
use stepwright_core::error::ToolError;
use stepwright_core::step::ToolInput;
use stepwright_core::tool::{Tool, ToolKind, required_str};
use tokio::process::Command;
use tracing::{debug, warn};

/// Executes shell commands and reports stdout, stderr, or the exit failure.
pub struct ExecuteCommandTool {
    shell: String,
}

impl ExecuteCommandTool {
    /// Use the platform shell (`cmd` on Windows, `sh` elsewhere).
    pub fn new() -> Self {
        let shell = if cfg!(target_os = "windows") { "cmd" } else { "sh" };
        Self::with_shell(shell)
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self { shell: shell.into() }
    }

    /// The flag that makes `shell` run a single command string.
    fn command_flag(&self) -> &'static str {
        let program = Path::new(&self.shell)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match program.as_str() {
            "cmd" => "/C",
            "powershell" | "pwsh" => "-Command",
            _ => "-c",
        }
    }
}

impl Default for ExecuteCommandTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn kind(&self) -> ToolKind {
        ToolKind::ExecuteCommand
    }

    fn description(&self) -> &str {
        "Executes a shell command on the user's machine and returns the output. Be mindful of the user's operating system."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let command = required_str(self.kind(), input, "command")?;

        debug!(command = %command, shell = %self.shell, "Executing shell command");

        // kill_on_drop so a registry timeout doesn't leave the child running
        let output = Command::new(&self.shell)
            .args([self.command_flag(), command])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ToolError::Io(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            warn!(command = %command, exit_code = code, "Command failed");
            return Err(ToolError::CommandFailed {
                command: command.to_string(),
                code,
                stderr,
            });
        }

        if !stderr.is_empty() {
            return Ok(format!("Stderr: {stderr}"));
        }

        Ok(stdout)
    }
}
