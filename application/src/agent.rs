//! The Agent façade

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AgentError;
use crate::graph::engine::{CompiledGraph, GraphBuilder};
use crate::graph::nodes::{AgentNode, PlannerNode, ReplanNode, ToolsNode, VerifierNode};
use crate::graph::routing::{route_after_agent, route_after_tools, route_after_verifier};
use crate::ports::chat_model::ChatModel;
use crate::prompts::{self, NODE_AGENT, NODE_PLANNER, NODE_REPLAN, NODE_VERIFIER};
use crate::tools::adapter::create_tools;
use crate::tools::alfredo_tool::AlfredoTool;
use alfredo_domain::{
    AgentState, Message, ModelFamily, PromptTemplates, READ_TODO_TOOL_ID, TodoStore, ToolRegistry,
    WRITE_TODO_TOOL_ID, truncate,
};

const DEFAULT_RECURSION_LIMIT: usize = 50;
const DEFAULT_MAX_CONTEXT_TOKENS: usize = 100_000;

/// Runs tasks through the plan/act/verify graph
///
/// Configuration is builder-style; every change that affects the graph
/// rebuilds it eagerly so `run` never starts with stale wiring.
pub struct Agent {
    model: Arc<dyn ChatModel>,
    registry: Arc<ToolRegistry>,
    cwd: PathBuf,
    variant: ModelFamily,
    tools: Arc<Vec<AlfredoTool>>,
    templates: PromptTemplates,
    todo: Arc<TodoStore>,
    enable_planning: bool,
    recursion_limit: usize,
    max_context_tokens: usize,
    cancel: Option<CancellationToken>,
    graph: CompiledGraph,
    results: Option<AgentState>,
}

impl Agent {
    /// Create an agent with every registry tool adapted for the generic
    /// variant.
    pub fn new(
        model: Arc<dyn ChatModel>,
        registry: Arc<ToolRegistry>,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        let cwd = cwd.into();
        let variant = ModelFamily::Generic;
        let tools: Arc<Vec<AlfredoTool>> =
            Arc::new(adapt_registry_tools(&registry, &cwd, variant));
        let todo = Arc::new(TodoStore::new());
        let templates = PromptTemplates::default();
        let enable_planning = true;
        let recursion_limit = DEFAULT_RECURSION_LIMIT;
        let graph = build_graph(
            &model,
            &tools,
            &todo,
            &templates,
            enable_planning,
            recursion_limit,
        );
        Self {
            model,
            registry,
            cwd,
            variant,
            tools,
            templates,
            todo,
            enable_planning,
            recursion_limit,
            max_context_tokens: DEFAULT_MAX_CONTEXT_TOKENS,
            cancel: None,
            graph,
            results: None,
        }
    }

    /// Replace the tool set entirely
    pub fn with_tools(mut self, tools: Vec<AlfredoTool>) -> Self {
        self.tools = Arc::new(tools);
        self.rebuild_graph();
        self
    }

    /// Re-adapt the registry tools for a different spec variant
    pub fn with_variant(mut self, variant: ModelFamily) -> Self {
        self.variant = variant;
        self.tools = Arc::new(adapt_registry_tools(&self.registry, &self.cwd, variant));
        self.rebuild_graph();
        self
    }

    pub fn with_planning(mut self, enabled: bool) -> Self {
        self.enable_planning = enabled;
        self.rebuild_graph();
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self.rebuild_graph();
        self
    }

    pub fn with_max_context_tokens(mut self, tokens: usize) -> Self {
        self.max_context_tokens = tokens;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Share a todo store with the registry's todo tool handlers
    pub fn with_todo_store(mut self, todo: Arc<TodoStore>) -> Self {
        self.todo = todo;
        self.rebuild_graph();
        self
    }

    /// Override the planner prompt.
    ///
    /// With planning disabled there is no planner node, so the override
    /// is applied to the agent prompt instead.
    pub fn set_planner_prompt(&mut self, template: impl Into<String>) -> Result<(), AgentError> {
        if !self.enable_planning {
            return self.set_agent_prompt(template);
        }
        let template = template.into();
        prompts::validate_node_template(NODE_PLANNER, &template)?;
        self.templates.planner = Some(template);
        self.rebuild_graph();
        Ok(())
    }

    pub fn set_agent_prompt(&mut self, template: impl Into<String>) -> Result<(), AgentError> {
        let template = template.into();
        prompts::validate_node_template(NODE_AGENT, &template)?;
        self.templates.agent = Some(template);
        self.rebuild_graph();
        Ok(())
    }

    pub fn set_verifier_prompt(&mut self, template: impl Into<String>) -> Result<(), AgentError> {
        let template = template.into();
        prompts::validate_node_template(NODE_VERIFIER, &template)?;
        self.templates.verifier = Some(template);
        self.rebuild_graph();
        Ok(())
    }

    pub fn set_replan_prompt(&mut self, template: impl Into<String>) -> Result<(), AgentError> {
        let template = template.into();
        prompts::validate_node_template(NODE_REPLAN, &template)?;
        self.templates.replan = Some(template);
        self.rebuild_graph();
        Ok(())
    }

    pub fn reset_prompts(&mut self) {
        self.templates = PromptTemplates::default();
        self.rebuild_graph();
    }

    pub fn prompt_template(&self, node: &str) -> Option<&str> {
        match node {
            NODE_PLANNER => self.templates.planner.as_deref(),
            NODE_AGENT => self.templates.agent.as_deref(),
            NODE_VERIFIER => self.templates.verifier.as_deref(),
            NODE_REPLAN => self.templates.replan.as_deref(),
            _ => None,
        }
    }

    pub fn tools(&self) -> &[AlfredoTool] {
        &self.tools
    }

    /// Whether a tool name refers to a registry tool (as opposed to an
    /// external one added through `with_tools`)
    pub fn is_native_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Run one task to completion
    pub async fn run(&mut self, task: &str) -> Result<AgentState, AgentError> {
        info!(task = %task, planning = self.enable_planning, "Starting agent run");
        let state = AgentState::new(task, self.max_context_tokens);
        let state = self.graph.invoke(state, self.cancel.as_ref()).await?;
        self.results = Some(state.clone());
        Ok(state)
    }

    /// State of the most recent run
    pub fn results(&self) -> Option<&AgentState> {
        self.results.as_ref()
    }

    /// Render the most recent run for a human reader: summary counters
    /// followed by the full message history.
    ///
    /// Long content is shortened here for terminal use only; the trace
    /// the verifier reads is rendered uncut elsewhere.
    pub fn render_trace(&self) -> Result<String, AgentError> {
        let state = self.results.as_ref().ok_or(AgentError::NotRun)?;
        let rule = "=".repeat(80);
        let mut out = format!("{rule}\nEXECUTION TRACE\n{rule}\n");
        out.push_str(&format!("Task: {}\n", state.task));
        out.push_str(&format!("Plan iterations: {}\n", state.plan_iteration));
        out.push_str(&format!("Total messages: {}\n", state.messages.len()));
        out.push_str(&format!("Verified: {}\n", state.is_verified));
        match &state.final_answer {
            Some(answer) => out.push_str(&format!("Final answer: {}\n", truncate(answer, 100))),
            None => out.push_str("Final answer: (none)\n"),
        }
        for (i, message) in state.messages.iter().enumerate() {
            out.push_str(&format!(
                "\n--- Message {} ({}) ---\n",
                i + 1,
                role_label(message)
            ));
            let content = message.content();
            if !content.is_empty() {
                out.push_str(&truncate(content, 500));
                out.push('\n');
            }
            for call in message.tool_calls() {
                let args = serde_json::to_string(call.args.as_map())
                    .unwrap_or_else(|_| "{}".to_string());
                out.push_str(&format!("Tool call: {} {}\n", call.name, truncate(&args, 200)));
            }
            if let Message::Tool { tool_name, call_id, .. } = message {
                out.push_str(&format!("Tool: {} (call {})\n", tool_name, call_id));
            }
        }
        Ok(out)
    }

    pub fn display_trace(&self) -> Result<(), AgentError> {
        println!("{}", self.render_trace()?);
        Ok(())
    }

    fn rebuild_graph(&mut self) {
        self.graph = build_graph(
            &self.model,
            &self.tools,
            &self.todo,
            &self.templates,
            self.enable_planning,
            self.recursion_limit,
        );
    }
}

fn role_label(message: &Message) -> &'static str {
    match message {
        Message::System { .. } => "system",
        Message::Human { .. } => "human",
        Message::Ai { .. } => "ai",
        Message::Tool { .. } => "tool",
    }
}

/// Adapt every registry tool and attach the todo-list prompt
/// instructions to the todo tools when the registry carries them.
fn adapt_registry_tools(
    registry: &ToolRegistry,
    cwd: &Path,
    variant: ModelFamily,
) -> Vec<AlfredoTool> {
    create_tools(registry, cwd, variant, None)
        .into_iter()
        .map(|adapted| {
            let tool = AlfredoTool::new(adapted);
            if tool.name() == WRITE_TODO_TOOL_ID || tool.name() == READ_TODO_TOOL_ID {
                tool.with_instruction(NODE_PLANNER, prompts::TODO_PLANNER_INSTRUCTIONS)
                    .with_instruction(NODE_AGENT, prompts::TODO_AGENT_INSTRUCTIONS)
            } else {
                tool
            }
        })
        .collect()
}

fn build_graph(
    model: &Arc<dyn ChatModel>,
    tools: &Arc<Vec<AlfredoTool>>,
    todo: &Arc<TodoStore>,
    templates: &PromptTemplates,
    enable_planning: bool,
    recursion_limit: usize,
) -> CompiledGraph {
    let entry = if enable_planning { "planner" } else { "agent" };
    let mut builder = GraphBuilder::new(entry)
        .add_node(
            "agent",
            AgentNode::new(model.clone(), tools.clone(), templates.agent.clone()),
        )
        .add_node("tools", ToolsNode::new(tools.clone(), todo.clone()))
        .add_node(
            "verifier",
            VerifierNode::new(model.clone(), tools.clone(), templates.verifier.clone()),
        )
        .add_conditional("agent", route_after_agent)
        .add_conditional("tools", route_after_tools)
        .add_conditional("verifier", move |state| {
            route_after_verifier(state, enable_planning)
        });

    if enable_planning {
        builder = builder
            .add_node(
                "planner",
                PlannerNode::new(model.clone(), tools.clone(), templates.planner.clone()),
            )
            .add_node(
                "replan",
                ReplanNode::new(model.clone(), tools.clone(), templates.replan.clone()),
            )
            .add_edge("planner", "agent")
            .add_edge("replan", "agent");
    }

    builder.compile(recursion_limit)
}
