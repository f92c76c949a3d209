//! Tool execution results

use serde::{Deserialize, Serialize};

/// Result of a tool execution (Value Object)
///
/// Tool failures are data, not errors: handlers always return a
/// `ToolResult`, and the orchestration layer renders failures back to the
/// model as `Error: {message}` text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl ToolResult {
    /// Successful execution with output text
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    /// Failed execution with an error message
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Render for the model: the output on success, `Error: {message}`
    /// otherwise.
    pub fn render(&self) -> String {
        if self.success {
            self.output.clone()
        } else {
            format!(
                "Error: {}",
                self.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_result() {
        let result = ToolResult::ok("file contents");
        assert!(result.is_success());
        assert_eq!(result.render(), "file contents");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_err_result_renders_with_prefix() {
        let result = ToolResult::err("File not found: missing.txt");
        assert!(!result.is_success());
        assert_eq!(result.render(), "Error: File not found: missing.txt");
    }
}
