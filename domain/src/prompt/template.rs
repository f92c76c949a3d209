//! Custom prompt template overrides
//!
//! A custom template comes in two flavors. If it uses any of the node's
//! `{placeholder}` variables it is an explicit template: every required
//! placeholder must be present and is substituted. Otherwise it is plain
//! text and gets auto-wrapped: the node's dynamic variables are prepended
//! as `# Title` sections and the tool instructions are appended verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-node custom template overrides; `None` means the built-in default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptTemplates {
    pub planner: Option<String>,
    pub agent: Option<String>,
    pub verifier: Option<String>,
    pub replan: Option<String>,
}

impl PromptTemplates {
    pub fn is_empty(&self) -> bool {
        self.planner.is_none()
            && self.agent.is_none()
            && self.verifier.is_none()
            && self.replan.is_none()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Custom {role} prompt template is missing required placeholders: {missing}")]
    MissingPlaceholders { role: String, missing: String },
}

fn placeholder(key: &str) -> String {
    format!("{{{}}}", key)
}

/// Whether the template uses at least one of the given placeholders
pub fn uses_placeholders(template: &str, keys: &[&str]) -> bool {
    keys.iter().any(|k| template.contains(&placeholder(k)))
}

/// Substitute an explicit template.
///
/// Every key in `required` must appear as a `{key}` placeholder; the
/// error names all missing ones. `vars` supplies the substitutions and
/// may include optional keys beyond the required set.
pub fn render_template(
    role: &str,
    template: &str,
    vars: &[(&str, &str)],
    required: &[&str],
) -> Result<String, TemplateError> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|k| !template.contains(&placeholder(k)))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(TemplateError::MissingPlaceholders {
            role: role.to_string(),
            missing: missing.join(", "),
        });
    }
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&placeholder(key), value);
    }
    Ok(out)
}

/// Wrap a plain-text template: `# Title` sections for the dynamic
/// variables, then the body, then the tool instructions verbatim.
pub fn auto_wrap(headers: &[(&str, &str)], body: &str, tool_instructions: &str) -> String {
    let mut out = String::new();
    for (title, value) in headers {
        out.push_str(&format!("# {}\n{}\n\n", title, value));
    }
    out.push_str(body);
    if !tool_instructions.is_empty() {
        out.push_str("\n\n");
        out.push_str(tool_instructions);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_placeholders() {
        assert!(uses_placeholders("Do {task} now", &["task", "plan"]));
        assert!(!uses_placeholders("Just some text", &["task", "plan"]));
    }

    #[test]
    fn test_render_substitutes_all_vars() {
        let out = render_template(
            "agent",
            "Task: {task}\nPlan: {plan}\nTools: {tool_instructions}",
            &[("task", "T"), ("plan", "P"), ("tool_instructions", "X")],
            &["task", "plan", "tool_instructions"],
        )
        .unwrap();
        assert_eq!(out, "Task: T\nPlan: P\nTools: X");
    }

    #[test]
    fn test_render_names_missing_placeholders() {
        let err = render_template(
            "planner",
            "Only {task} here",
            &[("task", "T"), ("tool_instructions", "X")],
            &["task", "tool_instructions"],
        )
        .unwrap_err();
        match err {
            TemplateError::MissingPlaceholders { role, missing } => {
                assert_eq!(role, "planner");
                assert_eq!(missing, "tool_instructions");
            }
        }
    }

    #[test]
    fn test_auto_wrap_puts_task_before_body() {
        let out = auto_wrap(&[("Task", "count files")], "Be careful.", "## read_file\n...");
        let task_idx = out.find("# Task\ncount files").unwrap();
        let body_idx = out.find("Be careful.").unwrap();
        let tools_idx = out.find("## read_file").unwrap();
        assert!(task_idx < body_idx);
        assert!(body_idx < tools_idx);
    }

    #[test]
    fn test_auto_wrap_without_tools() {
        let out = auto_wrap(&[("Task", "t")], "body", "");
        assert!(out.ends_with("body"));
    }
}
