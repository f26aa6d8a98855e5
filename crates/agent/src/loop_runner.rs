//! The step-protocol loop implementation.

use std::sync::Arc;
use std::time::Instant;
use stepwright_core::error::{Error, ProtocolError};
use stepwright_core::event::{DomainEvent, EventBus};
use stepwright_core::message::{Message, Role, Transcript};
use stepwright_core::provider::{Provider, ProviderRequest};
use stepwright_core::step::{Step, StepKind, ToolInput, parse_step};
use stepwright_core::tool::ToolRegistry;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::prompt;

/// The orchestration loop: asks the model for one step at a time and acts on it.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// Model turns allowed per request. None = unbounded.
    max_turns: Option<u32>,

    /// Ask the backend for JSON-object output
    json_mode: bool,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,
}

/// The result of a successful run.
#[derive(Debug)]
pub struct RunReport {
    /// Content of the OUTPUT step
    pub answer: String,

    /// Model turns taken
    pub turns: u32,

    /// The full transcript, including the final assistant message
    pub transcript: Transcript,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            tools,
            max_turns: None,
            json_mode: false,
            event_bus,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: Option<u32>) -> Self {
        self.max_tokens = max;
        self
    }

    /// Abort with [`Error::TurnLimitExceeded`] after `max` model turns.
    pub fn with_max_turns(mut self, max: Option<u32>) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    /// The system prompt for the registered tools.
    pub fn system_prompt(&self) -> String {
        prompt::system_prompt(&self.tools.definitions())
    }

    /// Run one request from a fresh transcript.
    pub async fn run(&self, request: &str) -> Result<RunReport, Error> {
        let mut transcript = Transcript::seeded(self.system_prompt(), request);
        let answer = self.process(&mut transcript).await?;
        let turns = count_turns(&transcript);

        Ok(RunReport {
            answer,
            turns,
            transcript,
        })
    }

    /// Drive the loop until the model emits an OUTPUT step.
    ///
    /// Every model reply is appended before it is validated, and every
    /// TOOL step appends exactly one developer message before the next
    /// model call. Returns the OUTPUT content.
    pub async fn process(&self, transcript: &mut Transcript) -> Result<String, Error> {
        info!(
            model = %self.model,
            messages = transcript.len(),
            max_turns = ?self.max_turns,
            "Processing request"
        );

        let mut turn: u32 = 0;

        loop {
            if let Some(max_turns) = self.max_turns
                && turn >= max_turns
            {
                return Err(self.fail(turn, Error::TurnLimitExceeded { max_turns }));
            }
            turn += 1;

            debug!(turn, messages = transcript.len(), "Awaiting model");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: transcript.snapshot().to_vec(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                stream: false,
                json_mode: self.json_mode,
            };

            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(e) => return Err(self.fail(turn, e.into())),
            };

            if let Some(usage) = &response.usage {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    model: response.model.clone(),
                    tokens_used: usage.total_tokens,
                    timestamp: Utc::now(),
                });
            }

            let raw = response.message.content;
            transcript.append(Message::assistant(raw.clone()));

            let step = match parse_step(&raw) {
                Ok(step) => step,
                Err(e) => return Err(self.fail(turn, e.into())),
            };

            if step.kind() != StepKind::Observe {
                self.event_bus.publish(DomainEvent::StepReceived {
                    turn,
                    kind: step.kind(),
                    content: step.content().to_string(),
                    timestamp: Utc::now(),
                });
            }

            match step {
                Step::Start { content } => {
                    info!(turn, content = %content, "Model started");
                }
                Step::Think { content } => {
                    debug!(turn, content = %content, "Model thinking");
                }
                Step::Tool {
                    tool_name, input, ..
                } => {
                    self.dispatch(transcript, &tool_name, &input).await;
                }
                Step::Output { content } => {
                    info!(turn, "Run completed");
                    self.event_bus.publish(DomainEvent::RunCompleted {
                        turns: turn,
                        answer: content.clone(),
                        timestamp: Utc::now(),
                    });
                    return Ok(content);
                }
                Step::Observe { .. } => {
                    let err = ProtocolError::MalformedStep {
                        raw,
                        reason: "OBSERVE steps come from the host, not the model".into(),
                    };
                    return Err(self.fail(turn, err.into()));
                }
            }
        }
    }

    /// Run one TOOL step and append exactly one developer message.
    async fn dispatch(&self, transcript: &mut Transcript, tool_name: &str, input: &ToolInput) {
        let tool = match self.tools.lookup(tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                warn!(tool = %tool_name, "Model requested an unknown tool");
                self.event_bus.publish(DomainEvent::UnknownTool {
                    tool_name: tool_name.to_string(),
                    timestamp: Utc::now(),
                });
                transcript.append(Message::developer(e.to_string()));
                return;
            }
        };

        let start = Instant::now();
        let outcome = self.tools.invoke(tool, input).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        self.event_bus.publish(DomainEvent::ToolExecuted {
            tool_name: outcome.tool.name().to_string(),
            input: serde_json::Value::Object(input.clone()),
            output: outcome.output.clone(),
            success: outcome.is_success(),
            duration_ms,
            timestamp: Utc::now(),
        });

        transcript.append(Message::observation(outcome.output));
    }

    fn fail(&self, turns: u32, error: Error) -> Error {
        warn!(turns, error = %error, "Run failed");
        self.event_bus.publish(DomainEvent::RunFailed {
            turns,
            error_message: error.to_string(),
            timestamp: Utc::now(),
        });
        error
    }
}

fn count_turns(transcript: &Transcript) -> u32 {
    transcript
        .snapshot()
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .count() as u32
}
