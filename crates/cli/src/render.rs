//! Terminal rendering of loop events.

use std::sync::Arc;
use stepwright_core::event::DomainEvent;
use stepwright_core::step::StepKind;
use tokio::sync::broadcast::{Receiver, error::RecvError};

/// Print events until every sender is gone.
pub async fn render_events(mut rx: Receiver<Arc<DomainEvent>>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(line) = render(&event) {
                    println!("{line}");
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer fell behind; events dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// The terminal line for an event, if it has one.
pub fn render(event: &DomainEvent) -> Option<String> {
    match event {
        DomainEvent::StepReceived { kind, content, .. } => match kind {
            StepKind::Start => Some(format!("🔥 {content}")),
            StepKind::Think => Some(format!("\t🧠 {content}")),
            _ => None,
        },
        DomainEvent::ToolExecuted {
            tool_name,
            input,
            output,
            ..
        } => Some(format!("🛠️: {tool_name}({input}) = {output}")),
        DomainEvent::UnknownTool { tool_name, .. } => {
            Some(format!("⚠️  model asked for unknown tool '{tool_name}'"))
        }
        // The answer is printed from the run's report, not the bus
        DomainEvent::RunCompleted { .. }
        | DomainEvent::ResponseGenerated { .. }
        | DomainEvent::RunFailed { .. } => None,
    }
}

/// The terminal line for the final answer.
pub fn answer_line(answer: &str) -> String {
    format!("🤖 {answer}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn renders_start_and_think() {
        let start = DomainEvent::StepReceived {
            turn: 1,
            kind: StepKind::Start,
            content: "Create a file".into(),
            timestamp: Utc::now(),
        };
        assert_eq!(render(&start).as_deref(), Some("🔥 Create a file"));

        let think = DomainEvent::StepReceived {
            turn: 2,
            kind: StepKind::Think,
            content: "Use create_file".into(),
            timestamp: Utc::now(),
        };
        assert_eq!(render(&think).as_deref(), Some("\t🧠 Use create_file"));
    }

    #[test]
    fn tool_steps_render_via_execution() {
        let tool_step = DomainEvent::StepReceived {
            turn: 3,
            kind: StepKind::Tool,
            content: String::new(),
            timestamp: Utc::now(),
        };
        assert!(render(&tool_step).is_none());

        let executed = DomainEvent::ToolExecuted {
            tool_name: "create_file".into(),
            input: serde_json::json!({"path": "notes.txt"}),
            output: "Successfully created file: notes.txt".into(),
            success: true,
            duration_ms: 1,
            timestamp: Utc::now(),
        };
        assert_eq!(
            render(&executed).as_deref(),
            Some(r#"🛠️: create_file({"path":"notes.txt"}) = Successfully created file: notes.txt"#)
        );
    }

    #[test]
    fn answer_comes_from_the_report_not_the_bus() {
        let done = DomainEvent::RunCompleted {
            turns: 4,
            answer: "Done, notes.txt created.".into(),
            timestamp: Utc::now(),
        };
        assert!(render(&done).is_none());
        assert_eq!(answer_line("Done, notes.txt created."), "🤖 Done, notes.txt created.");
    }

    #[tokio::test]
    async fn lagging_renderer_still_finishes() {
        let (tx, rx) = tokio::sync::broadcast::channel(1);
        for turn in 0..4 {
            tx.send(Arc::new(DomainEvent::StepReceived {
                turn,
                kind: StepKind::Tool,
                content: String::new(),
                timestamp: Utc::now(),
            }))
            .unwrap();
        }
        drop(tx);

        // Lagged is logged, Closed ends the loop
        tokio::time::timeout(std::time::Duration::from_secs(1), render_events(rx))
            .await
            .unwrap();
    }
}
