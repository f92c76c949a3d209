//! A small named-step graph runner
//!
//! Nodes mutate the shared [`AgentState`]; routers are pure functions of
//! the state deciding the next step. Execution stops at [`END`], on a
//! fatal error, on cancellation, or when the recursion limit (counted in
//! node executions) is exceeded.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::AgentError;
use alfredo_domain::AgentState;

/// Terminal sentinel for routers
pub const END: &str = "__end__";

/// One executable step of the graph
#[async_trait]
pub trait Node: Send + Sync {
    async fn run(&self, state: &mut AgentState) -> Result<(), AgentError>;
}

/// Pure routing function over the state
pub type Router = Box<dyn Fn(&AgentState) -> &'static str + Send + Sync>;

pub struct GraphBuilder {
    entry: &'static str,
    nodes: HashMap<&'static str, Box<dyn Node>>,
    routers: HashMap<&'static str, Router>,
}

impl GraphBuilder {
    pub fn new(entry: &'static str) -> Self {
        Self {
            entry,
            nodes: HashMap::new(),
            routers: HashMap::new(),
        }
    }

    pub fn add_node(mut self, name: &'static str, node: impl Node + 'static) -> Self {
        self.nodes.insert(name, Box::new(node));
        self
    }

    /// Unconditional edge
    pub fn add_edge(mut self, from: &'static str, to: &'static str) -> Self {
        self.routers.insert(from, Box::new(move |_| to));
        self
    }

    /// Conditional edge routed by a predicate over the state
    pub fn add_conditional(
        mut self,
        from: &'static str,
        router: impl Fn(&AgentState) -> &'static str + Send + Sync + 'static,
    ) -> Self {
        self.routers.insert(from, Box::new(router));
        self
    }

    pub fn compile(self, recursion_limit: usize) -> CompiledGraph {
        CompiledGraph {
            entry: self.entry,
            nodes: self.nodes,
            routers: self.routers,
            recursion_limit,
        }
    }
}

pub struct CompiledGraph {
    entry: &'static str,
    nodes: HashMap<&'static str, Box<dyn Node>>,
    routers: HashMap<&'static str, Router>,
    recursion_limit: usize,
}

impl CompiledGraph {
    /// Run the graph to completion over the given state.
    ///
    /// The cancellation token is checked before every node execution.
    pub async fn invoke(
        &self,
        mut state: AgentState,
        cancel: Option<&CancellationToken>,
    ) -> Result<AgentState, AgentError> {
        let mut current = self.entry;
        let mut steps = 0usize;

        while current != END {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(AgentError::Cancelled);
                }
            }
            steps += 1;
            if steps > self.recursion_limit {
                return Err(AgentError::RecursionLimitExceeded(self.recursion_limit));
            }

            let node = self
                .nodes
                .get(current)
                .ok_or_else(|| AgentError::UnknownNode(current.to_string()))?;
            debug!(step = steps, node = current, "Executing graph node");
            node.run(&mut state).await?;

            current = match self.routers.get(current) {
                Some(router) => router(&state),
                None => END,
            };
        }

        Ok(state)
    }
}
