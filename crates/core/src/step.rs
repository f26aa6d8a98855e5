//! The step protocol — one structured object per model turn.
//!
//! Wire shape:
//!
//! ```json
//! { "step": "TOOL", "content": "…", "tool_name": "read_file", "input": { "path": "notes.txt" } }
//! ```
//!
//! [`parse_step`] is the only way model text becomes a [`Step`]. It checks
//! structure only; whether `tool_name` names a real tool is decided at
//! dispatch time by the registry.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// Arguments of a TOOL step: a flat map of argument name to value.
pub type ToolInput = serde_json::Map<String, serde_json::Value>;

/// One turn of the step protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "UPPERCASE")]
pub enum Step {
    /// The model restates the task.
    Start { content: String },

    /// A reasoning step.
    Think { content: String },

    /// A tool invocation request.
    Tool {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        content: String,
        tool_name: String,
        #[serde(default, deserialize_with = "null_as_empty")]
        input: ToolInput,
    },

    /// A tool result. Only ever produced by the host.
    Observe { content: String },

    /// The final answer.
    Output { content: String },
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<ToolInput, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ToolInput>::deserialize(deserializer)?.unwrap_or_default())
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Start { .. } => StepKind::Start,
            Self::Think { .. } => StepKind::Think,
            Self::Tool { .. } => StepKind::Tool,
            Self::Observe { .. } => StepKind::Observe,
            Self::Output { .. } => StepKind::Output,
        }
    }

    /// The free-text content carried by the step.
    pub fn content(&self) -> &str {
        match self {
            Self::Start { content }
            | Self::Think { content }
            | Self::Tool { content, .. }
            | Self::Observe { content }
            | Self::Output { content } => content,
        }
    }

    /// Serialize to the JSON wire form.
    pub fn to_wire(&self) -> String {
        // A map with string keys always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// The tag of a [`Step`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepKind {
    Start,
    Think,
    Tool,
    Observe,
    Output,
}

impl StepKind {
    pub const ALL: [StepKind; 5] = [
        StepKind::Start,
        StepKind::Think,
        StepKind::Tool,
        StepKind::Observe,
        StepKind::Output,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Think => "THINK",
            Self::Tool => "TOOL",
            Self::Observe => "OBSERVE",
            Self::Output => "OUTPUT",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown step tag '{s}'"))
    }
}

/// Decode one turn of raw model output.
///
/// Whitespace and a single enclosing Markdown code fence are tolerated.
/// Anything that is not JSON is a [`ProtocolError::Parse`]; JSON that does
/// not fit a step is a [`ProtocolError::MalformedStep`].
pub fn parse_step(raw: &str) -> Result<Step, ProtocolError> {
    let body = strip_code_fence(raw.trim());

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ProtocolError::Parse {
            raw: raw.to_string(),
            reason: e.to_string(),
        })?;

    let malformed = |reason: String| ProtocolError::MalformedStep {
        raw: raw.to_string(),
        reason,
    };

    let Some(object) = value.as_object() else {
        return Err(malformed("expected a JSON object".into()));
    };

    match object.get("step") {
        None => return Err(malformed("missing 'step' field".into())),
        Some(serde_json::Value::String(tag)) => {
            tag.parse::<StepKind>().map_err(malformed)?;
        }
        Some(other) => {
            return Err(malformed(format!("'step' must be a string, got {other}")));
        }
    }

    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}

/// Strip a surrounding ```` ``` ```` fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return text;
    };

    match inner.find('\n') {
        Some(i) if inner[..i].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            inner[i + 1..].trim()
        }
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_think_step() {
        let step = parse_step(r#"{"step":"THINK","content":"I need a file"}"#).unwrap();
        assert_eq!(
            step,
            Step::Think {
                content: "I need a file".into()
            }
        );
        assert_eq!(step.kind(), StepKind::Think);
    }

    #[test]
    fn parse_tool_step() {
        let raw = r#"{"step":"TOOL","content":"creating","tool_name":"create_file","input":{"path":"notes.txt"}}"#;
        match parse_step(raw).unwrap() {
            Step::Tool {
                content,
                tool_name,
                input,
            } => {
                assert_eq!(content, "creating");
                assert_eq!(tool_name, "create_file");
                assert_eq!(input["path"], "notes.txt");
            }
            other => panic!("Expected TOOL, got {other:?}"),
        }
    }

    #[test]
    fn tool_step_without_content_or_input() {
        let step = parse_step(r#"{"step":"TOOL","tool_name":"list_files"}"#).unwrap();
        match step {
            Step::Tool { content, input, .. } => {
                assert!(content.is_empty());
                assert!(input.is_empty());
            }
            other => panic!("Expected TOOL, got {other:?}"),
        }
    }

    #[test]
    fn null_input_is_empty() {
        let step =
            parse_step(r#"{"step":"TOOL","tool_name":"list_files","input":null}"#).unwrap();
        assert!(matches!(step, Step::Tool { input, .. } if input.is_empty()));
    }

    #[test]
    fn extra_fields_on_non_tool_steps_are_ignored() {
        let raw = r#"{"step":"OUTPUT","content":"Done","tool_name":"","input":"OBJECT"}"#;
        assert_eq!(
            parse_step(raw).unwrap(),
            Step::Output {
                content: "Done".into()
            }
        );
    }

    #[test]
    fn plain_prose_is_a_parse_error() {
        let err = parse_step("Sure! I'll create that file for you.").unwrap_err();
        assert!(matches!(err, ProtocolError::Parse { .. }));
        assert_eq!(err.raw(), "Sure! I'll create that file for you.");
    }

    #[test]
    fn missing_step_tag_is_malformed() {
        let err = parse_step(r#"{"content":"hello"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedStep { ref reason, .. } if reason.contains("missing")));
    }

    #[test]
    fn unknown_step_tag_is_malformed() {
        let err = parse_step(r#"{"step":"REFLECT","content":"hmm"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedStep { ref reason, .. } if reason.contains("REFLECT")));
    }

    #[test]
    fn lowercase_tag_is_malformed() {
        let err = parse_step(r#"{"step":"think","content":"hmm"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedStep { .. }));
    }

    #[test]
    fn non_object_json_is_malformed() {
        let err = parse_step(r#"["THINK"]"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedStep { .. }));
    }

    #[test]
    fn tool_without_name_is_malformed() {
        let err = parse_step(r#"{"step":"TOOL","input":{}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedStep { .. }));
    }

    #[test]
    fn tool_with_string_input_is_malformed() {
        let err =
            parse_step(r#"{"step":"TOOL","tool_name":"read_file","input":"notes.txt"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedStep { .. }));
    }

    #[test]
    fn fenced_json_is_accepted() {
        let raw = "```json\n{\"step\":\"START\",\"content\":\"go\"}\n```";
        assert_eq!(parse_step(raw).unwrap().kind(), StepKind::Start);

        let bare = "```\n{\"step\":\"OUTPUT\",\"content\":\"ok\"}\n```";
        assert_eq!(parse_step(bare).unwrap().content(), "ok");
    }

    #[test]
    fn observe_wire_form() {
        let step = Step::Observe {
            content: "file text".into(),
        };
        assert_eq!(step.to_wire(), r#"{"step":"OBSERVE","content":"file text"}"#);
    }

    #[test]
    fn step_kind_from_str() {
        assert_eq!("OUTPUT".parse::<StepKind>().unwrap(), StepKind::Output);
        assert!("output".parse::<StepKind>().is_err());
    }
}
