//! Manual (pseudo-XML) tool session
//!
//! The legacy surface for models without native tool calling: tools are
//! described in the system prompt with pseudo-XML usage blocks, and the
//! model's reply is parsed for `<tool_name><param>…</param></tool_name>`.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use alfredo_domain::{ModelFamily, ToolResult, ToolRegistry, ToolUse, parse_tool_use};

pub struct ManualSession {
    registry: Arc<ToolRegistry>,
    cwd: PathBuf,
    variant: ModelFamily,
    /// Prompt context consulted by parameter gating
    context: serde_json::Map<String, Value>,
}

impl ManualSession {
    pub fn new(registry: Arc<ToolRegistry>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            cwd: cwd.into(),
            variant: ModelFamily::Generic,
            context: serde_json::Map::new(),
        }
    }

    pub fn with_variant(mut self, variant: ModelFamily) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_context_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Base instructions followed by every tool's prompt rendering
    pub fn system_prompt(&self, base_instructions: &str) -> String {
        let specs = self.registry.get_specs_for_variant(self.variant);
        let tool_docs: Vec<String> = specs
            .iter()
            .map(|s| s.format_for_prompt(&self.context))
            .collect();
        format!(
            "{}\n\n# Tools\n\nCall a tool by replying with its pseudo-XML form:\n\
<tool_name>\n<parameter>value</parameter>\n</tool_name>\n\n{}",
            base_instructions,
            tool_docs.join("\n\n")
        )
    }

    pub fn parse(&self, text: &str) -> Option<ToolUse> {
        parse_tool_use(text)
    }

    /// Execute a parsed tool use through the registry
    pub async fn execute(&self, tool_use: &ToolUse) -> ToolResult {
        match self.registry.get_handler(&tool_use.name, &self.cwd) {
            Some(handler) => handler.execute(&tool_use.params).await,
            None => ToolResult::err(format!("Unknown tool: {}", tool_use.name)),
        }
    }

    /// Parse the model's reply and execute the first tool use, if any
    pub async fn execute_from_text(&self, text: &str) -> Option<ToolResult> {
        let tool_use = self.parse(text)?;
        Some(self.execute(&tool_use).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alfredo_domain::{ToolHandler, ToolParameter, ToolParams, ToolSpec};
    use async_trait::async_trait;

    struct UpperHandler;

    #[async_trait]
    impl ToolHandler for UpperHandler {
        fn tool_id(&self) -> &str {
            "upper"
        }

        async fn execute(&self, params: &ToolParams) -> ToolResult {
            match params.require_str("text") {
                Ok(text) => ToolResult::ok(text.to_uppercase()),
                Err(e) => ToolResult::err(e),
            }
        }
    }

    fn session() -> ManualSession {
        let mut registry = ToolRegistry::new();
        registry.register_spec(
            ToolSpec::new("upper", "Uppercase")
                .with_instructions("Uppercase some text.")
                .with_parameter(ToolParameter::new("text", true, "Text to transform", "text")),
        );
        registry.register_handler("upper", Arc::new(|_| Box::new(UpperHandler)));
        ManualSession::new(Arc::new(registry), ".")
    }

    #[test]
    fn test_system_prompt_includes_usage_blocks() {
        let prompt = session().system_prompt("You are a text assistant.");
        assert!(prompt.starts_with("You are a text assistant."));
        assert!(prompt.contains("## upper"));
        assert!(prompt.contains("<upper>\n<text>text</text>\n</upper>"));
    }

    #[tokio::test]
    async fn test_execute_from_text() {
        let result = session()
            .execute_from_text("Sure: <upper><text>hello</text></upper>")
            .await
            .unwrap();
        assert_eq!(result.render(), "HELLO");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failure_not_panic() {
        let session = session();
        let tool_use = session.parse("<ghost><x>1</x></ghost>").unwrap();
        let result = session.execute(&tool_use).await;
        assert!(!result.is_success());
        assert!(result.error.as_deref().unwrap().contains("ghost"));
    }
}
