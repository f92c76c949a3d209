//! The tool handler trait

use async_trait::async_trait;

use crate::tool::params::ToolParams;
use crate::tool::result::ToolResult;

/// Executes one tool (Port)
///
/// This is the single execution interface for every tool, built-in or
/// not. Implementations must not panic on bad input and must not let
/// errors escape `execute`: anything that goes wrong becomes a
/// [`ToolResult::err`], which the orchestration layer renders back to the
/// model as text.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The spec id this handler executes
    fn tool_id(&self) -> &str;

    async fn execute(&self, params: &ToolParams) -> ToolResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        fn tool_id(&self) -> &str {
            "echo"
        }

        async fn execute(&self, params: &ToolParams) -> ToolResult {
            match params.require_str("text") {
                Ok(text) => ToolResult::ok(text),
                Err(e) => ToolResult::err(e),
            }
        }
    }

    #[tokio::test]
    async fn test_handler_reports_missing_param_as_failure() {
        let handler = EchoHandler;
        let result = handler.execute(&ToolParams::new()).await;
        assert!(!result.is_success());
        assert!(result.error.as_deref().unwrap().contains("text"));
    }

    #[tokio::test]
    async fn test_handler_success() {
        let handler = EchoHandler;
        let params = ToolParams::new().with("text", "hello");
        let result = handler.execute(&params).await;
        assert_eq!(result.render(), "hello");
    }
}
