//! Execution-trace rendering for verification and display

use crate::message::Message;
use crate::state::COMPLETION_MARKER;

/// Render a step-numbered execution trace from the transcript.
///
/// Synthetic bookkeeping messages (`Task:`, `Verification result:`,
/// `Plan created:`, `Creating improved plan`) and system messages are
/// skipped so the trace shows only what the agent actually did. Content
/// is rendered in full; the verifier judges the answer against this
/// trace, so nothing may be cut.
pub fn format_execution_trace(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "No actions recorded.".to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut step = 1;

    for message in messages {
        match message {
            Message::Ai {
                content,
                tool_calls,
            } => {
                if !tool_calls.is_empty() {
                    for call in tool_calls {
                        lines.push(format!("**Step {}: Called tool `{}`**", step, call.name));
                        let args = serde_json::to_string(call.args.as_map())
                            .unwrap_or_else(|_| "{}".to_string());
                        lines.push(format!("  Arguments: {}", args));
                        step += 1;
                    }
                } else if !content.is_empty()
                    && !content.starts_with("Plan created:")
                    && !content.starts_with("Creating improved plan")
                {
                    lines.push(format!("**Step {}: Agent reasoning**", step));
                    lines.push(format!("  {}", content));
                    step += 1;
                }
            }
            Message::Tool { content, .. } => {
                if content.contains(COMPLETION_MARKER) {
                    lines.push("  → Result: Task completion signal received".to_string());
                } else {
                    lines.push(format!("  → Result: {}", content));
                }
            }
            Message::Human { content } => {
                if !content.starts_with("Task:") && !content.starts_with("Verification result:") {
                    lines.push(format!("**Step {}: User input**", step));
                    lines.push(format!("  {}", content));
                    step += 1;
                }
            }
            Message::System { .. } => {}
        }
    }

    if lines.is_empty() {
        "No significant actions recorded.".to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ToolCallRequest;
    use crate::tool::params::ToolParams;

    #[test]
    fn test_empty_transcript() {
        assert_eq!(format_execution_trace(&[]), "No actions recorded.");
    }

    #[test]
    fn test_all_skipped_transcript() {
        let messages = vec![
            Message::system("be helpful"),
            Message::human("Task: count files"),
            Message::ai("Plan created:\n\n1. list"),
        ];
        assert_eq!(
            format_execution_trace(&messages),
            "No significant actions recorded."
        );
    }

    #[test]
    fn test_tool_call_and_result_steps() {
        let messages = vec![
            Message::human("Task: count files"),
            Message::ai("Plan created:\n\n1. list"),
            Message::ai_with_calls(
                "",
                vec![ToolCallRequest::new(
                    "c1",
                    "list_files",
                    ToolParams::new().with("path", "."),
                )],
            ),
            Message::tool("a.rs\nb.rs", "list_files", "c1"),
        ];
        let trace = format_execution_trace(&messages);
        assert!(trace.contains("**Step 1: Called tool `list_files`**"));
        assert!(trace.contains(r#"Arguments: {"path":"."}"#));
        assert!(trace.contains("  → Result: a.rs\nb.rs"));
        // Synthetic messages are skipped.
        assert!(!trace.contains("Task: count files"));
        assert!(!trace.contains("Plan created"));
    }

    #[test]
    fn test_long_tool_result_rendered_in_full() {
        let long_output = "line of evidence\n".repeat(40);
        assert!(long_output.len() > 400);
        let messages = vec![
            Message::ai_with_calls(
                "",
                vec![ToolCallRequest::new(
                    "c1",
                    "execute_command",
                    ToolParams::new().with("command", "x".repeat(300)),
                )],
            ),
            Message::tool(long_output.clone(), "execute_command", "c1"),
        ];
        let trace = format_execution_trace(&messages);
        assert!(trace.contains(&long_output));
        assert!(trace.contains(&"x".repeat(300)));
        assert!(!trace.contains("..."));
    }

    #[test]
    fn test_completion_signal_not_dumped() {
        let messages = vec![Message::tool(
            "[TASK_COMPLETE]\nsecret answer",
            "attempt_completion",
            "c1",
        )];
        let trace = format_execution_trace(&messages);
        assert!(trace.contains("  → Result: Task completion signal received"));
        assert!(!trace.contains("secret answer"));
    }

    #[test]
    fn test_reasoning_and_step_numbering() {
        let messages = vec![
            Message::ai("Let me think about this."),
            Message::ai_with_calls(
                "",
                vec![
                    ToolCallRequest::new("c1", "read_file", ToolParams::new()),
                    ToolCallRequest::new("c2", "read_file", ToolParams::new()),
                ],
            ),
        ];
        let trace = format_execution_trace(&messages);
        assert!(trace.contains("**Step 1: Agent reasoning**"));
        assert!(trace.contains("**Step 2: Called tool `read_file`**"));
        assert!(trace.contains("**Step 3: Called tool `read_file`**"));
    }
}
