//! Variant-aware tool registry

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::tool::handler::ToolHandler;
use crate::tool::spec::{ModelFamily, ToolSpec};

/// Constructs a handler bound to a working directory
pub type HandlerCtor = Arc<dyn Fn(&Path) -> Box<dyn ToolHandler> + Send + Sync>;

/// Registry of tool specs and handler constructors
///
/// Owned by the caller and passed explicitly wherever tools are needed.
/// Specs are keyed by (variant, tool id); handlers are variant-agnostic
/// and keyed by tool id alone.
///
/// Lookup falls back to [`ModelFamily::Generic`] at two granularities:
/// [`get_spec`](Self::get_spec) falls back per id, while
/// [`get_specs_for_variant`](Self::get_specs_for_variant) returns the
/// generic collection wholesale when a variant has no specs of its own.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    specs: HashMap<ModelFamily, HashMap<String, ToolSpec>>,
    handlers: HashMap<String, HandlerCtor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spec under its own variant, replacing any previous spec
    /// with the same (variant, id).
    pub fn register_spec(&mut self, spec: ToolSpec) {
        self.specs
            .entry(spec.variant)
            .or_default()
            .insert(spec.id.clone(), spec);
    }

    pub fn register_handler(&mut self, id: impl Into<String>, ctor: HandlerCtor) {
        self.handlers.insert(id.into(), ctor);
    }

    /// Look up a spec for a variant, falling back to the generic spec of
    /// the same id.
    pub fn get_spec(&self, id: &str, variant: ModelFamily) -> Option<&ToolSpec> {
        if let Some(spec) = self.specs.get(&variant).and_then(|m| m.get(id)) {
            return Some(spec);
        }
        if variant != ModelFamily::Generic {
            return self
                .specs
                .get(&ModelFamily::Generic)
                .and_then(|m| m.get(id));
        }
        None
    }

    /// All specs visible for a variant.
    ///
    /// If the variant has any spec of its own the returned collection is
    /// exactly that variant's specs; otherwise it is the whole generic
    /// collection. There is no per-id merge across variants.
    pub fn get_specs_for_variant(&self, variant: ModelFamily) -> Vec<&ToolSpec> {
        let collection = match self.specs.get(&variant) {
            Some(specs) if !specs.is_empty() => Some(specs),
            _ if variant != ModelFamily::Generic => self.specs.get(&ModelFamily::Generic),
            other => other,
        };
        let mut specs: Vec<&ToolSpec> = collection
            .map(|m| m.values().collect())
            .unwrap_or_default();
        specs.sort_by(|a, b| a.id.cmp(&b.id));
        specs
    }

    /// Construct the handler for a tool, bound to the given working
    /// directory.
    pub fn get_handler(&self, id: &str, cwd: &Path) -> Option<Box<dyn ToolHandler>> {
        self.handlers.get(id).map(|ctor| ctor(cwd))
    }

    pub fn has_handler(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Sorted union of tool ids across every variant
    pub fn get_all_tool_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&str> = self
            .specs
            .values()
            .flat_map(|m| m.keys())
            .map(String::as_str)
            .collect();
        ids.into_iter().map(String::from).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.specs.values().any(|m| m.contains_key(id))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_ids", &self.get_all_tool_ids())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
