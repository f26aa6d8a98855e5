//! Built-in tool implementations for Stepwright.
//!
//! Tools give the agent the ability to interact with the user's machine:
//! create, list, read and write files, run shell commands, and ask a
//! secondary model to generate code.

pub mod create_file;
pub mod execute_command;
pub mod generate_code;
pub mod list_files;
pub mod read_file;
pub mod write_file;

use std::sync::Arc;
use std::time::Duration;
use stepwright_core::provider::Provider;
use stepwright_core::tool::ToolRegistry;

pub use create_file::CreateFileTool;
pub use execute_command::ExecuteCommandTool;
pub use generate_code::GenerateCodeTool;
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;
pub use write_file::WriteFileTool;

/// Settings for [`default_registry`].
#[derive(Debug, Clone, Default)]
pub struct ToolSettings {
    /// Model used by generate_code
    pub code_model: String,
    /// Shell override for execute_command
    pub shell: Option<String>,
    /// Per-invocation timeout
    pub timeout: Option<Duration>,
}

/// Create a registry with all six built-in tools.
///
/// `provider` backs generate_code.
pub fn default_registry(provider: Arc<dyn Provider>, settings: ToolSettings) -> ToolRegistry {
    let mut registry = match settings.timeout {
        Some(timeout) => ToolRegistry::new().with_timeout(timeout),
        None => ToolRegistry::new(),
    };

    let shell = match settings.shell {
        Some(shell) => ExecuteCommandTool::with_shell(shell),
        None => ExecuteCommandTool::new(),
    };

    registry.register(Box::new(CreateFileTool));
    registry.register(Box::new(ListFilesTool));
    registry.register(Box::new(ReadFileTool));
    registry.register(Box::new(WriteFileTool));
    registry.register(Box::new(GenerateCodeTool::new(provider, settings.code_model)));
    registry.register(Box::new(shell));
    registry
}
