//! Routing predicates between graph steps
//!
//! Pure functions of the state so the control flow is deterministic for
//! a given transcript.

use crate::graph::engine::END;
use alfredo_domain::{AgentState, COMPLETION_MARKER, COMPLETION_TOOL_ID, Message};

/// After the agent step: execute tools if the reply requested any,
/// otherwise loop back to the agent to try again.
pub fn route_after_agent(state: &AgentState) -> &'static str {
    match state.last_message() {
        Some(message) if message.has_tool_calls() => "tools",
        _ => "agent",
    }
}

/// After the tools step: go to the verifier once a completion signal is
/// present, otherwise hand the results back to the agent.
///
/// The signal is either the completion marker in the last message or a
/// tool message from the completion tool (covering the case where the
/// marker got mangled).
pub fn route_after_tools(state: &AgentState) -> &'static str {
    match state.last_message() {
        Some(message) if message.content().contains(COMPLETION_MARKER) => "verifier",
        Some(Message::Tool { tool_name, .. }) if tool_name == COMPLETION_TOOL_ID => "verifier",
        _ => "agent",
    }
}

/// After the verifier step: done when verified; otherwise replan, unless
/// planning is disabled, in which case the unverified answer stands.
pub fn route_after_verifier(state: &AgentState, planning_enabled: bool) -> &'static str {
    if state.is_verified {
        END
    } else if planning_enabled {
        "replan"
    } else {
        END
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alfredo_domain::{ToolCallRequest, ToolParams};

    fn state_with(messages: Vec<Message>) -> AgentState {
        let mut state = AgentState::new("t", 1000);
        state.messages = messages;
        state
    }

    #[test]
    fn test_agent_with_tool_calls_goes_to_tools() {
        let state = state_with(vec![Message::ai_with_calls(
            "",
            vec![ToolCallRequest::new("c1", "read_file", ToolParams::new())],
        )]);
        assert_eq!(route_after_agent(&state), "tools");
    }

    #[test]
    fn test_agent_without_tool_calls_loops() {
        let state = state_with(vec![Message::ai("I think the answer is 42.")]);
        assert_eq!(route_after_agent(&state), "agent");
        assert_eq!(route_after_agent(&state_with(vec![])), "agent");
    }

    #[test]
    fn test_tools_route_on_marker() {
        let state = state_with(vec![Message::tool(
            "[TASK_COMPLETE]\ndone",
            "attempt_completion",
            "c1",
        )]);
        assert_eq!(route_after_tools(&state), "verifier");
    }

    #[test]
    fn test_tools_route_on_completion_tool_name() {
        // Marker missing from the content, tool name still routes.
        let state = state_with(vec![Message::tool("done", "attempt_completion", "c1")]);
        assert_eq!(route_after_tools(&state), "verifier");
    }

    #[test]
    fn test_tools_route_back_to_agent() {
        let state = state_with(vec![Message::tool("file contents", "read_file", "c1")]);
        assert_eq!(route_after_tools(&state), "agent");
    }

    #[test]
    fn test_verifier_routing() {
        let mut state = state_with(vec![]);
        state.is_verified = true;
        assert_eq!(route_after_verifier(&state, true), END);

        state.is_verified = false;
        assert_eq!(route_after_verifier(&state, true), "replan");
        assert_eq!(route_after_verifier(&state, false), END);
    }

    #[test]
    fn test_routing_is_deterministic() {
        let state = state_with(vec![Message::ai("no calls")]);
        let first = route_after_agent(&state);
        for _ in 0..10 {
            assert_eq!(route_after_agent(&state), first);
        }
    }
}
