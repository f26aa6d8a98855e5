//! # Stepwright Core
//!
//! Domain types, traits, and error definitions for the Stepwright agent.
//! This crate has **no I/O of its own** — it defines the step protocol,
//! the transcript, and the provider/tool seams that the other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (LLM backend, tool capability) is a trait
//! here. Implementations live in their respective crates, so the loop can
//! be exercised with scripted fakes.

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod step;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProtocolError, ProviderError, Result, ToolError};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, Role, Transcript};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk};
pub use step::{Step, StepKind, ToolInput, parse_step};
pub use tool::{Tool, ToolKind, ToolOutcome, ToolRegistry};
