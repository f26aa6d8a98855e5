//! Message and Transcript domain types.
//!
//! The transcript is the model's entire context window: it is replayed
//! verbatim on every turn, so insertion order is semantically meaningful.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::step::Step;

/// The role of a message sender in a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (protocol rules, tool catalog)
    System,
    /// The human operator's request
    User,
    /// Raw model output, one per turn
    Assistant,
    /// Host-originated notes: observations and dispatch errors
    Developer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Developer => "developer",
        }
    }
}

/// A single message in a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new developer message.
    pub fn developer(content: impl Into<String>) -> Self {
        Self::with_role(Role::Developer, content)
    }

    /// Wrap a tool result as an OBSERVE step addressed to the model.
    pub fn observation(result: impl Into<String>) -> Self {
        let step = Step::Observe {
            content: result.into(),
        };
        Self::developer(step.to_wire())
    }
}

/// An append-only, ordered message log.
///
/// Messages can only be added at the end and are only handed out by
/// shared reference, so nothing already sent to the model can change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a transcript with the system instructions and the user's request.
    pub fn seeded(system_prompt: impl Into<String>, request: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.append(Message::system(system_prompt));
        transcript.append(Message::user(request));
        transcript
    }

    /// Add a message to the end of the transcript.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full ordered sequence, as sent to the model.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_transcript_starts_with_system_then_user() {
        let t = Transcript::seeded("rules", "create notes.txt");
        assert_eq!(t.len(), 2);
        assert_eq!(t.snapshot()[0].role, Role::System);
        assert_eq!(t.snapshot()[0].content, "rules");
        assert_eq!(t.snapshot()[1].role, Role::User);
        assert_eq!(t.snapshot()[1].content, "create notes.txt");
    }

    #[test]
    fn append_preserves_order() {
        let mut t = Transcript::seeded("rules", "go");
        t.append(Message::assistant("first"));
        t.append(Message::developer("second"));
        t.append(Message::assistant("third"));

        let contents: Vec<&str> = t.snapshot().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["rules", "go", "first", "second", "third"]);
        assert_eq!(t.last().unwrap().content, "third");
    }

    #[test]
    fn observation_is_a_developer_observe_step() {
        let msg = Message::observation("Successfully created file: notes.txt");
        assert_eq!(msg.role, Role::Developer);

        let value: serde_json::Value = serde_json::from_str(&msg.content).unwrap();
        assert_eq!(value["step"], "OBSERVE");
        assert_eq!(value["content"], "Successfully created file: notes.txt");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Developer).unwrap();
        assert_eq!(json, "\"developer\"");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }
}
