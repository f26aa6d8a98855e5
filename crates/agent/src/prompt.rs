//! System prompt for the step protocol.

use stepwright_core::tool::ToolDefinition;

const PREAMBLE: &str = "\
You are an AI assistant that works in START, THINK and OUTPUT steps.
For a given user request, first think and break the problem down into sub-problems.
Keep thinking step by step before giving the actual output, and check once
that everything is correct before you output the final result.

You have a list of tools you can call based on the user's request. After every
TOOL step, wait for the OBSERVE step: it carries the output of the tool you called.";

const RULES: &str = "\
Rules:
- Strictly follow the output JSON format.
- Emit exactly one step per response and wait for the next turn.
- The \"input\" of a TOOL step must be a JSON object with the argument names as keys.
- Follow the sequence START, THINK, TOOL, OBSERVE and OUTPUT.
- Always do several THINK steps before the OUTPUT step.
- Never emit OBSERVE yourself; observations come from the host.

Output JSON Format:
{ \"step\": \"START | THINK | TOOL | OUTPUT\", \"content\": \"string\", \"tool_name\": \"string\", \"input\": { } }";

/// Build the system prompt, listing `tools` in the given order.
pub fn system_prompt(tools: &[ToolDefinition]) -> String {
    let catalog: Vec<String> = tools.iter().map(catalog_line).collect();
    format!(
        "{PREAMBLE}\n\nAvailable Tools:\n{}\n\n{RULES}\n",
        catalog.join("\n")
    )
}

/// `- name(args: { a: string, b?: string }): description`
fn catalog_line(tool: &ToolDefinition) -> String {
    let required: Vec<&str> = tool.parameters["required"]
        .as_array()
        .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
        .unwrap_or_default();

    let args: Vec<String> = tool.parameters["properties"]
        .as_object()
        .map(|props| {
            props
                .iter()
                .map(|(name, schema)| {
                    let ty = schema["type"].as_str().unwrap_or("any");
                    let marker = if required.contains(&name.as_str()) { "" } else { "?" };
                    format!("{name}{marker}: {ty}")
                })
                .collect()
        })
        .unwrap_or_default();

    format!(
        "- {}(args: {{ {} }}): {}",
        tool.name,
        args.join(", "),
        tool.description
    )
}
