//! Error types for the Stepwright domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the loop only ever
//! surfaces [`Error`].

use thiserror::Error;

use crate::tool::ToolKind;

/// The top-level error type for all Stepwright operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Step protocol errors ---
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Loop guard ---
    #[error("Turn limit of {max_turns} model turns exceeded without an OUTPUT step")]
    TurnLimitExceeded { max_turns: u32 },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures decoding one model turn into a [`Step`](crate::step::Step).
///
/// Both variants keep the raw model text so the caller can show exactly
/// what the model produced.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    /// The text is not well-formed JSON at all.
    #[error("Model output is not valid JSON: {reason}")]
    Parse { raw: String, reason: String },

    /// Well-formed JSON that does not match any step shape.
    #[error("Malformed step: {reason}")]
    MalformedStep { raw: String, reason: String },
}

impl ProtocolError {
    /// The raw model output that failed to decode.
    pub fn raw(&self) -> &str {
        match self {
            Self::Parse { raw, .. } | Self::MalformedStep { raw, .. } => raw,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// The model named a tool outside the registry.
    #[error("There is no such tool as {0}")]
    UnknownTool(String),

    #[error("invalid input for {tool}: {reason}")]
    InvalidInput { tool: ToolKind, reason: String },

    #[error("{0}")]
    Io(String),

    #[error("Command failed: {command} (exit code {code}){}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("{0}")]
    Generation(String),

    #[error("{tool} timed out after {timeout_secs}s")]
    Timeout { tool: ToolKind, timeout_secs: u64 },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}
