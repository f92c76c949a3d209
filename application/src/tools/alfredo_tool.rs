//! AlfredoTool: an adapted tool plus per-node prompt instructions

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::tools::adapter::{AdaptedTool, AdapterError, ExternalFn, create_tool};
use alfredo_domain::{ModelFamily, ToolParams, ToolRegistry};

/// A tool as the agent graph sees it (Entity)
///
/// Wraps an [`AdaptedTool`] with optional system-prompt instructions per
/// graph node ("planner", "agent", "verifier", "replan") and free-form
/// metadata. A tool with no instruction for a node simply contributes
/// nothing to that node's prompt.
#[derive(Debug)]
pub struct AlfredoTool {
    inner: AdaptedTool,
    instructions: HashMap<String, String>,
    metadata: serde_json::Map<String, Value>,
}

impl AlfredoTool {
    pub fn new(inner: AdaptedTool) -> Self {
        Self {
            inner,
            instructions: HashMap::new(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Adapt a registry tool and wrap it
    pub fn from_registry(
        registry: &ToolRegistry,
        id: &str,
        cwd: &Path,
        variant: ModelFamily,
    ) -> Result<Self, AdapterError> {
        Ok(Self::new(create_tool(registry, id, cwd, variant)?))
    }

    /// Wrap an external async function
    pub fn from_external(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        func: ExternalFn,
    ) -> Self {
        Self::new(AdaptedTool::from_external(name, description, input_schema, func))
    }

    pub fn with_instruction(mut self, node: impl Into<String>, text: impl Into<String>) -> Self {
        self.instructions.insert(node.into(), text.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn description(&self) -> &str {
        self.inner.description()
    }

    pub fn schema(&self) -> Value {
        self.inner.schema()
    }

    pub fn metadata(&self) -> &serde_json::Map<String, Value> {
        &self.metadata
    }

    pub fn get_instruction_for_node(&self, node: &str) -> Option<&str> {
        self.instructions.get(node).map(String::as_str)
    }

    /// Nodes this tool contributes prompt instructions to, sorted
    pub fn get_target_nodes(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = self.instructions.keys().map(String::as_str).collect();
        nodes.sort_unstable();
        nodes
    }

    pub async fn invoke(&self, params: &ToolParams) -> String {
        self.inner.invoke(params).await
    }
}

/// Shared handle used by the graph nodes
pub type ToolSet = Arc<Vec<AlfredoTool>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn external_tool() -> AlfredoTool {
        let func: ExternalFn = Arc::new(|_| Box::pin(async { "done".to_string() }));
        AlfredoTool::from_external("remote", "A remote tool", json!({"type": "object"}), func)
    }

    #[test]
    fn test_instructions_per_node() {
        let tool = external_tool()
            .with_instruction("agent", "Use remote wisely.")
            .with_instruction("planner", "remote exists.");

        assert_eq!(
            tool.get_instruction_for_node("agent"),
            Some("Use remote wisely.")
        );
        assert_eq!(tool.get_instruction_for_node("verifier"), None);
        assert_eq!(tool.get_target_nodes(), vec!["agent", "planner"]);
    }

    #[test]
    fn test_metadata_round_trip() {
        let mut meta = serde_json::Map::new();
        meta.insert("server".into(), json!("mcp-local"));
        let tool = external_tool().with_metadata(meta);
        assert_eq!(tool.metadata()["server"], "mcp-local");
    }
}
