//! Agent run state and the completion-marker protocol

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// First line of a tool message that signals the task is complete
pub const COMPLETION_MARKER: &str = "[TASK_COMPLETE]";

/// Tool id that emits the completion marker
pub const COMPLETION_TOOL_ID: &str = "attempt_completion";

/// Suffix appended to a completion message when a final command was given
pub const FINAL_COMMAND_PREFIX: &str = "\nFinal command executed:";

/// First line of a followup-question tool message
pub const FOLLOWUP_MARKER: &str = "[AWAITING_USER_RESPONSE]";

/// A verifier reply starting with this (after trimming) means verified
pub const VERIFIED_PREFIX: &str = "VERIFIED:";

/// Mutable state threaded through one agent run (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<Message>,
    pub task: String,
    pub plan: String,
    pub plan_iteration: u32,
    /// Carried for prompt assembly; nothing trims the transcript yet
    pub max_context_tokens: usize,
    pub final_answer: Option<String>,
    pub is_verified: bool,
    pub todo_list: Option<String>,
}

impl AgentState {
    /// Fresh state for a new run
    pub fn new(task: impl Into<String>, max_context_tokens: usize) -> Self {
        Self {
            messages: Vec::new(),
            task: task.into(),
            plan: String::new(),
            plan_iteration: 0,
            max_context_tokens,
            final_answer: None,
            is_verified: false,
            todo_list: None,
        }
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Extract the answer from the most recent completion-marker tool message.
///
/// Scans the transcript backwards for a tool message containing
/// [`COMPLETION_MARKER`]; the answer is everything after the first
/// newline, with any trailing `Final command executed:` suffix removed
/// and surrounding whitespace trimmed. A marker with no following text
/// extracts the empty string; no marker at all returns `None`.
pub fn extract_attempt_completion(messages: &[Message]) -> Option<String> {
    for message in messages.iter().rev() {
        if let Message::Tool { content, .. } = message {
            if content.contains(COMPLETION_MARKER) {
                let answer = match content.split_once('\n') {
                    Some((_, rest)) => rest,
                    None => "",
                };
                let answer = match answer.find(FINAL_COMMAND_PREFIX) {
                    Some(idx) => &answer[..idx],
                    None => answer,
                };
                return Some(answer.trim().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = AgentState::new("list files", 100_000);
        assert!(state.messages.is_empty());
        assert_eq!(state.plan, "");
        assert_eq!(state.plan_iteration, 0);
        assert_eq!(state.final_answer, None);
        assert!(!state.is_verified);
        assert_eq!(state.todo_list, None);
    }

    #[test]
    fn test_extract_answer() {
        let messages = vec![
            Message::human("Task: x"),
            Message::tool(
                "[TASK_COMPLETE]\nThe answer is 42.",
                "attempt_completion",
                "call_1",
            ),
        ];
        assert_eq!(
            extract_attempt_completion(&messages).unwrap(),
            "The answer is 42."
        );
    }

    #[test]
    fn test_extract_strips_final_command_suffix() {
        let messages = vec![Message::tool(
            "[TASK_COMPLETE]\nDone.\n\nFinal command executed: cargo test",
            "attempt_completion",
            "call_1",
        )];
        assert_eq!(extract_attempt_completion(&messages).unwrap(), "Done.");
    }

    #[test]
    fn test_extract_marker_without_answer_is_empty() {
        let messages = vec![Message::tool("[TASK_COMPLETE]", "attempt_completion", "c1")];
        assert_eq!(extract_attempt_completion(&messages).unwrap(), "");
    }

    #[test]
    fn test_extract_takes_most_recent_marker() {
        let messages = vec![
            Message::tool("[TASK_COMPLETE]\nfirst", "attempt_completion", "c1"),
            Message::human("Verification result: NOT_VERIFIED: wrong"),
            Message::tool("[TASK_COMPLETE]\nsecond", "attempt_completion", "c2"),
        ];
        assert_eq!(extract_attempt_completion(&messages).unwrap(), "second");
    }

    #[test]
    fn test_extract_ignores_non_tool_messages() {
        let messages = vec![Message::ai("[TASK_COMPLETE]\nnot a tool message")];
        assert_eq!(extract_attempt_completion(&messages), None);
    }
}
