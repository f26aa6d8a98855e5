//! Domain event system — the loop's observer channel.
//!
//! The loop publishes an event for every step it processes. Front ends
//! subscribe to render progress; nothing in the loop depends on anyone
//! listening.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::step::StepKind;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// The model produced a well-formed step
    StepReceived {
        turn: u32,
        kind: StepKind,
        content: String,
        timestamp: DateTime<Utc>,
    },

    /// The model responded; usage is reported when the backend provides it
    ResponseGenerated {
        model: String,
        tokens_used: u32,
        timestamp: DateTime<Utc>,
    },

    /// A tool was executed
    ToolExecuted {
        tool_name: String,
        input: serde_json::Value,
        output: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The model asked for a tool that is not registered
    UnknownTool {
        tool_name: String,
        timestamp: DateTime<Utc>,
    },

    /// The loop reached an OUTPUT step
    RunCompleted {
        turns: u32,
        answer: String,
        timestamp: DateTime<Utc>,
    },

    /// The loop aborted
    RunFailed {
        turns: u32,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::StepReceived {
            turn: 1,
            kind: StepKind::Think,
            content: "break it down".into(),
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::StepReceived { turn, kind, content, .. } => {
                assert_eq!(*turn, 1);
                assert_eq!(*kind, StepKind::Think);
                assert_eq!(content, "break it down");
            }
            _ => panic!("Expected StepReceived event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DomainEvent::RunFailed {
            turns: 0,
            error_message: "no subscribers".into(),
            timestamp: Utc::now(),
        });
    }
}
