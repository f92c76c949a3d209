//! Adapting registry tools to a model-facing shape

use std::path::Path;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::warn;

use alfredo_domain::{
    COMPLETION_TOOL_ID, ModelFamily, ToolHandler, ToolParams, ToolRegistry, ToolSpec,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    #[error("Tool '{0}' has no spec in the registry")]
    SpecNotFound(String),

    #[error("Tool '{0}' has no handler in the registry")]
    HandlerNotFound(String),
}

/// Async function backing an external (non-registry) tool
pub type ExternalFn = Arc<dyn Fn(ToolParams) -> BoxFuture<'static, String> + Send + Sync>;

enum Invoker {
    Handler(Arc<dyn ToolHandler>),
    External(ExternalFn),
}

/// A tool in the shape the model sees: name, description, JSON input
/// schema, and an invoker that always yields text.
///
/// `invoke` never fails: handler failures come back as `Error: {message}`
/// text for the model to read.
pub struct AdaptedTool {
    name: String,
    description: String,
    input_schema: Value,
    invoker: Invoker,
}

impl AdaptedTool {
    /// Wrap a registry handler under its spec
    pub fn from_handler(spec: &ToolSpec, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            name: spec.id.clone(),
            description: spec.instructions.clone(),
            input_schema: build_input_schema(spec),
            invoker: Invoker::Handler(handler),
        }
    }

    /// Wrap an external async function (e.g. a remote MCP-style tool)
    pub fn from_external(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        func: ExternalFn,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            invoker: Invoker::External(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Neutral schema shape passed to gateways
    pub fn schema(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema,
        })
    }

    pub async fn invoke(&self, params: &ToolParams) -> String {
        match &self.invoker {
            Invoker::Handler(handler) => handler.execute(params).await.render(),
            Invoker::External(func) => func(params.clone()).await,
        }
    }
}

impl std::fmt::Debug for AdaptedTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptedTool")
            .field("name", &self.name)
            .field(
                "kind",
                &match self.invoker {
                    Invoker::Handler(_) => "handler",
                    Invoker::External(_) => "external",
                },
            )
            .finish()
    }
}

/// JSON Schema for a spec's parameters.
///
/// Context-gated parameters are always included here; gating only applies
/// to plain-text prompt rendering.
pub fn build_input_schema(spec: &ToolSpec) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required: Vec<&str> = Vec::new();
    for param in &spec.parameters {
        properties.insert(
            param.name.clone(),
            json!({
                "type": "string",
                "description": param.instruction,
            }),
        );
        if param.required {
            required.push(&param.name);
        }
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Adapt a single registry tool for a variant.
///
/// Errors when the spec (after generic fallback) or the handler is
/// missing.
pub fn create_tool(
    registry: &ToolRegistry,
    id: &str,
    cwd: &Path,
    variant: ModelFamily,
) -> Result<AdaptedTool, AdapterError> {
    let spec = registry
        .get_spec(id, variant)
        .ok_or_else(|| AdapterError::SpecNotFound(id.to_string()))?;
    let handler = registry
        .get_handler(id, cwd)
        .ok_or_else(|| AdapterError::HandlerNotFound(id.to_string()))?;
    Ok(AdaptedTool::from_handler(spec, Arc::from(handler)))
}

/// Adapt a set of registry tools for a variant.
///
/// `ids` defaults to every tool visible for the variant. The completion
/// tool is force-included exactly once regardless of the list. Tools
/// that fail to adapt are skipped with a warning rather than aborting
/// the rest.
pub fn create_tools(
    registry: &ToolRegistry,
    cwd: &Path,
    variant: ModelFamily,
    ids: Option<&[String]>,
) -> Vec<AdaptedTool> {
    let mut selected: Vec<String> = match ids {
        Some(ids) => ids.to_vec(),
        None => registry
            .get_specs_for_variant(variant)
            .iter()
            .map(|s| s.id.clone())
            .collect(),
    };
    if !selected.iter().any(|id| id == COMPLETION_TOOL_ID) {
        selected.push(COMPLETION_TOOL_ID.to_string());
    }

    let mut tools = Vec::with_capacity(selected.len());
    let mut seen: Vec<&str> = Vec::new();
    for id in &selected {
        if seen.contains(&id.as_str()) {
            continue;
        }
        seen.push(id);
        match create_tool(registry, id, cwd, variant) {
            Ok(tool) => tools.push(tool),
            Err(e) => warn!(tool = %id, error = %e, "Skipping tool that failed to adapt"),
        }
    }
    tools
}
