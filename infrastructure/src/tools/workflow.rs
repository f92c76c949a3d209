//! Workflow tools: completion signaling and followup questions

use async_trait::async_trait;

use alfredo_domain::{
    COMPLETION_MARKER, FOLLOWUP_MARKER, ToolHandler, ToolParameter, ToolParams, ToolResult,
    ToolSpec,
};

pub const ATTEMPT_COMPLETION: &str = "attempt_completion";
pub const ASK_FOLLOWUP_QUESTION: &str = "ask_followup_question";

pub fn attempt_completion_spec() -> ToolSpec {
    ToolSpec::new(ATTEMPT_COMPLETION, "Attempt Completion")
        .with_instructions(
            "Present the final result of the task. Call this exactly once, \
after all the work is done; it ends the task and hands the result to \
verification.",
        )
        .with_parameter(ToolParameter::new(
            "result",
            true,
            "The final result of the task, complete and self-contained",
            "The repository contains 42 Rust files.",
        ))
        .with_parameter(ToolParameter::new(
            "command",
            false,
            "A command that demonstrates the result, if one exists",
            "cargo test",
        ))
}

pub fn ask_followup_question_spec() -> ToolSpec {
    ToolSpec::new(ASK_FOLLOWUP_QUESTION, "Ask Followup Question")
        .with_instructions(
            "Ask the user a clarifying question when the task cannot proceed \
without more information. Use sparingly; prefer finding the answer with \
the other tools.",
        )
        .with_parameter(ToolParameter::new(
            "question",
            true,
            "The question to ask the user",
            "Which environment should I deploy to?",
        ))
}

pub struct AttemptCompletionHandler;

#[async_trait]
impl ToolHandler for AttemptCompletionHandler {
    fn tool_id(&self) -> &str {
        ATTEMPT_COMPLETION
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let result = match params.require_str("result") {
            Ok(result) => result,
            Err(e) => return ToolResult::err(e),
        };
        let mut output = format!("{}\n{}", COMPLETION_MARKER, result);
        if let Some(command) = params.get_str("command").filter(|c| !c.is_empty()) {
            output.push_str(&format!("\n\nFinal command executed: {}", command));
        }
        ToolResult::ok(output)
    }
}

pub struct AskFollowupQuestionHandler;

#[async_trait]
impl ToolHandler for AskFollowupQuestionHandler {
    fn tool_id(&self) -> &str {
        ASK_FOLLOWUP_QUESTION
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        match params.require_str("question") {
            Ok(question) => ToolResult::ok(format!("{}\n{}", FOLLOWUP_MARKER, question)),
            Err(e) => ToolResult::err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alfredo_domain::{Message, extract_attempt_completion};

    #[tokio::test]
    async fn test_completion_marker_on_first_line() {
        let handler = AttemptCompletionHandler;
        let result = handler
            .execute(&ToolParams::new().with("result", "All done."))
            .await;
        assert_eq!(result.output, "[TASK_COMPLETE]\nAll done.");
    }

    #[tokio::test]
    async fn test_completion_with_command_round_trips_through_extraction() {
        let handler = AttemptCompletionHandler;
        let result = handler
            .execute(
                &ToolParams::new()
                    .with("result", "Tests pass.")
                    .with("command", "cargo test"),
            )
            .await;
        assert!(result.output.contains("\nFinal command executed: cargo test"));

        let messages = vec![Message::tool(result.output, ATTEMPT_COMPLETION, "c1")];
        assert_eq!(
            extract_attempt_completion(&messages).unwrap(),
            "Tests pass."
        );
    }

    #[tokio::test]
    async fn test_completion_requires_result() {
        let handler = AttemptCompletionHandler;
        let result = handler.execute(&ToolParams::new()).await;
        assert_eq!(
            result.error.as_deref().unwrap(),
            "Missing required parameter: result"
        );
    }

    #[tokio::test]
    async fn test_followup_question_marker() {
        let handler = AskFollowupQuestionHandler;
        let result = handler
            .execute(&ToolParams::new().with("question", "Deploy where?"))
            .await;
        assert_eq!(result.output, "[AWAITING_USER_RESPONSE]\nDeploy where?");
    }
}
