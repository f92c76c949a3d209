//! Built-in prompt bodies for the four model-calling steps
//!
//! Each function renders the body WITHOUT tool instructions; the
//! application layer appends the per-node tool block after the body.

/// Default planning prompt
pub fn planning_body(task: &str) -> String {
    format!(
        "You are an expert planning assistant. Your job is to create a clear, \
actionable plan for completing the task below.

# Task
{task}

Create a step-by-step plan. For each step, state what to do and which tool \
to use. Keep steps concrete and verifiable; prefer fewer, larger steps over \
many trivial ones.

Plan format:
1. [Action] - [Tool to use] - [Expected outcome]
2. ...

IMPORTANT: The final step must ALWAYS be calling the attempt_completion tool \
to present the result of the task.

Respond with the plan only, no preamble."
    )
}

/// Default agent (execution) system prompt
pub fn agent_body(task: &str, plan: &str) -> String {
    format!(
        "You are Alfredo, an autonomous assistant that completes tasks by \
calling tools.

# Task
{task}

# Plan
{plan}

Work through the plan step by step. In each turn, reason briefly about what \
to do next, then call exactly the tools you need. Read before you write; \
verify your work with the tools available instead of assuming success.

If a tool call fails, read the error, adjust, and try a different approach \
rather than repeating the same call.

⚠️ CRITICAL: How to Complete the Task
When the task is done, you MUST call the attempt_completion tool with the \
final result. Do not just describe the result in text; the task only \
finishes when attempt_completion is called."
    )
}

/// Default verification prompt
///
/// `trace_section` is either empty or a pre-rendered
/// `# Execution Trace` block.
pub fn verification_body(task: &str, answer: &str, trace_section: &str) -> String {
    format!(
        "You are a strict verifier. Judge whether the answer below actually \
completes the task, using the execution trace as evidence.

# Task
{task}

# Answer
{answer}
{trace_section}
Check that the answer addresses every part of the task and that the trace \
supports it. An answer that merely claims success without supporting \
actions is not verified.

Respond with EXACTLY one of:
- VERIFIED: <one sentence on why the answer is correct>
- NOT_VERIFIED: <what is missing or wrong, specifically>"
    )
}

/// Default replanning prompt
pub fn replan_body(task: &str, previous_plan: &str, feedback: &str) -> String {
    format!(
        "The previous attempt at this task failed verification. Create an \
improved plan that fixes the problems.

# Task
{task}

# Previous Plan
{previous_plan}

# Verification Feedback
{feedback}

Address the feedback directly: keep the steps that worked, change the ones \
that did not, and add any steps that were missing.

IMPORTANT: The final step must ALWAYS be calling the attempt_completion tool \
to present the result of the task.

Respond with the improved plan only, no preamble."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planning_body_demands_completion_tool() {
        let body = planning_body("count the files");
        assert!(body.contains("# Task\ncount the files"));
        assert!(body.contains("attempt_completion"));
    }

    #[test]
    fn test_verification_body_lists_verdicts() {
        let body = verification_body("t", "a", "");
        assert!(body.contains("VERIFIED:"));
        assert!(body.contains("NOT_VERIFIED:"));
    }
}
