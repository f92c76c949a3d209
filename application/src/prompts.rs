//! Prompt assembly for the four model-calling nodes
//!
//! Each function takes the node's dynamic values, the active tool set,
//! and an optional custom template, and produces the final prompt text.
//! Custom templates follow the explicit-placeholder or auto-wrap rules in
//! [`alfredo_domain::prompt::template`].

use crate::tools::alfredo_tool::AlfredoTool;
use alfredo_domain::prompt::defaults;
use alfredo_domain::prompt::template::{
    TemplateError, auto_wrap, render_template, uses_placeholders,
};

pub const NODE_PLANNER: &str = "planner";
pub const NODE_AGENT: &str = "agent";
pub const NODE_VERIFIER: &str = "verifier";
pub const NODE_REPLAN: &str = "replan";

/// Planner-side instructions carried by the todo tools.
pub const TODO_PLANNER_INSTRUCTIONS: &str = "# Todo List Tracking\n\n\
After creating the plan, call the `write_todo_list` tool to record it as a \
numbered checklist:\n\n1. [ ] First step\n2. [ ] Second step\n\n\
The checklist is used to track completion while the plan is executed.";

/// Agent-side instructions carried by the todo tools.
pub const TODO_AGENT_INSTRUCTIONS: &str = "# Todo List Management\n\n\
Todo list tools are available for tracking progress:\n\
- `write_todo_list` creates or replaces the numbered checklist\n\
- `read_todo_list` shows the current checklist\n\n\
Work through the checklist in order. After finishing a step, call \
`write_todo_list` again with that step marked `[x]`. Revise the checklist \
whenever new requirements appear.";

/// Tool instructions targeted at one node, blank-line separated in tool
/// order. Duplicate blocks are emitted once; several tools may share one
/// instruction text. Empty when no tool addresses the node.
pub fn tool_instructions_for_node(tools: &[AlfredoTool], node: &str) -> String {
    let mut blocks: Vec<&str> = Vec::new();
    for tool in tools {
        if let Some(text) = tool.get_instruction_for_node(node) {
            if !blocks.contains(&text) {
                blocks.push(text);
            }
        }
    }
    blocks.join("\n\n")
}

fn append_tools(mut body: String, tool_block: &str) -> String {
    if !tool_block.is_empty() {
        body.push_str("\n\n");
        body.push_str(tool_block);
    }
    body
}

pub fn planning_prompt(
    task: &str,
    tools: &[AlfredoTool],
    template: Option<&str>,
) -> Result<String, TemplateError> {
    let tool_block = tool_instructions_for_node(tools, NODE_PLANNER);
    let required = ["task", "tool_instructions"];
    match template {
        None => Ok(append_tools(defaults::planning_body(task), &tool_block)),
        Some(t) if uses_placeholders(t, &required) => render_template(
            NODE_PLANNER,
            t,
            &[("task", task), ("tool_instructions", &tool_block)],
            &required,
        ),
        Some(t) => Ok(auto_wrap(&[("Task", task)], t, &tool_block)),
    }
}

pub fn agent_prompt(
    task: &str,
    plan: &str,
    tools: &[AlfredoTool],
    template: Option<&str>,
) -> Result<String, TemplateError> {
    let tool_block = tool_instructions_for_node(tools, NODE_AGENT);
    let required = ["task", "plan", "tool_instructions"];
    match template {
        None => Ok(append_tools(defaults::agent_body(task, plan), &tool_block)),
        Some(t) if uses_placeholders(t, &required) => render_template(
            NODE_AGENT,
            t,
            &[
                ("task", task),
                ("plan", plan),
                ("tool_instructions", &tool_block),
            ],
            &required,
        ),
        Some(t) => Ok(auto_wrap(
            &[("Task", task), ("Plan", plan)],
            t,
            &tool_block,
        )),
    }
}

pub fn verification_prompt(
    task: &str,
    answer: &str,
    trace: &str,
    tools: &[AlfredoTool],
    template: Option<&str>,
) -> Result<String, TemplateError> {
    let tool_block = tool_instructions_for_node(tools, NODE_VERIFIER);
    let required = ["task", "answer", "trace_section", "tool_instructions"];
    let trace_section = if trace.is_empty() {
        String::new()
    } else {
        format!("\n# Execution Trace\n{}\n", trace)
    };
    match template {
        None => Ok(append_tools(
            defaults::verification_body(task, answer, &trace_section),
            &tool_block,
        )),
        Some(t) if uses_placeholders(t, &required) => render_template(
            NODE_VERIFIER,
            t,
            &[
                ("task", task),
                ("answer", answer),
                ("trace_section", &trace_section),
                ("tool_instructions", &tool_block),
            ],
            &required,
        ),
        Some(t) => Ok(auto_wrap(
            &[("Task", task), ("Answer", answer), ("Execution Trace", trace)],
            t,
            &tool_block,
        )),
    }
}

pub fn replan_prompt(
    task: &str,
    previous_plan: &str,
    feedback: &str,
    tools: &[AlfredoTool],
    template: Option<&str>,
) -> Result<String, TemplateError> {
    let tool_block = tool_instructions_for_node(tools, NODE_REPLAN);
    let required = [
        "task",
        "previous_plan",
        "verification_feedback",
        "tool_instructions",
    ];
    match template {
        None => Ok(append_tools(
            defaults::replan_body(task, previous_plan, feedback),
            &tool_block,
        )),
        Some(t) if uses_placeholders(t, &required) => render_template(
            NODE_REPLAN,
            t,
            &[
                ("task", task),
                ("previous_plan", previous_plan),
                ("verification_feedback", feedback),
                ("tool_instructions", &tool_block),
            ],
            &required,
        ),
        Some(t) => Ok(auto_wrap(
            &[
                ("Task", task),
                ("Previous Plan", previous_plan),
                ("Verification Feedback", feedback),
            ],
            t,
            &tool_block,
        )),
    }
}

/// Required placeholders for a node's explicit custom template
pub fn required_placeholders(node: &str) -> &'static [&'static str] {
    match node {
        NODE_PLANNER => &["task", "tool_instructions"],
        NODE_AGENT => &["task", "plan", "tool_instructions"],
        NODE_VERIFIER => &["task", "answer", "trace_section", "tool_instructions"],
        NODE_REPLAN => &[
            "task",
            "previous_plan",
            "verification_feedback",
            "tool_instructions",
        ],
        _ => &[],
    }
}

/// Validate a custom template for a node without rendering it.
///
/// Plain-text (auto-wrap) templates always pass; explicit templates must
/// carry the node's full placeholder set.
pub fn validate_node_template(node: &str, template: &str) -> Result<(), TemplateError> {
    let required = required_placeholders(node);
    if uses_placeholders(template, required) {
        let vars: Vec<(&str, &str)> = required.iter().map(|k| (*k, "")).collect();
        render_template(node, template, &vars, required).map(|_| ())
    } else {
        Ok(())
    }
}
