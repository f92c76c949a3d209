//! The five graph nodes

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::AgentError;
use crate::graph::engine::Node;
use crate::ports::chat_model::{ChatModel, ChatRequest};
use crate::prompts;
use crate::tools::alfredo_tool::AlfredoTool;
use alfredo_domain::{
    AgentState, Message, TodoStore, VERIFIED_PREFIX, extract_attempt_completion,
    format_execution_trace,
};

/// Drafts the initial plan with one model call
pub struct PlannerNode {
    model: Arc<dyn ChatModel>,
    tools: Arc<Vec<AlfredoTool>>,
    template: Option<String>,
}

impl PlannerNode {
    pub fn new(
        model: Arc<dyn ChatModel>,
        tools: Arc<Vec<AlfredoTool>>,
        template: Option<String>,
    ) -> Self {
        Self {
            model,
            tools,
            template,
        }
    }
}

#[async_trait]
impl Node for PlannerNode {
    async fn run(&self, state: &mut AgentState) -> Result<(), AgentError> {
        let prompt = prompts::planning_prompt(&state.task, &self.tools, self.template.as_deref())?;
        let messages = [Message::human(prompt)];
        let reply = self.model.complete(ChatRequest::new(&messages)).await?;
        let plan = reply.content().to_string();

        info!(iteration = state.plan_iteration + 1, "Plan created");
        let task_note = format!("Task: {}", state.task);
        state.plan = plan.clone();
        state.plan_iteration += 1;
        state.push_message(Message::human(task_note));
        state.push_message(Message::ai(format!("Plan created:\n\n{}", plan)));
        Ok(())
    }
}

/// Executes one reasoning turn against the full transcript
pub struct AgentNode {
    model: Arc<dyn ChatModel>,
    tools: Arc<Vec<AlfredoTool>>,
    template: Option<String>,
    schemas: Vec<serde_json::Value>,
}

impl AgentNode {
    pub fn new(
        model: Arc<dyn ChatModel>,
        tools: Arc<Vec<AlfredoTool>>,
        template: Option<String>,
    ) -> Self {
        let schemas = tools.iter().map(|t| t.schema()).collect();
        Self {
            model,
            tools,
            template,
            schemas,
        }
    }
}

#[async_trait]
impl Node for AgentNode {
    async fn run(&self, state: &mut AgentState) -> Result<(), AgentError> {
        let system =
            prompts::agent_prompt(&state.task, &state.plan, &self.tools, self.template.as_deref())?;
        let reply = self
            .model
            .complete(
                ChatRequest::new(&state.messages)
                    .with_system(&system)
                    .with_tools(&self.schemas),
            )
            .await?;
        debug!(tool_calls = reply.tool_calls().len(), "Agent turn complete");
        state.push_message(reply);
        Ok(())
    }
}

/// Executes the tool calls requested by the last agent turn
pub struct ToolsNode {
    tools: Arc<Vec<AlfredoTool>>,
    todo: Arc<TodoStore>,
}

impl ToolsNode {
    pub fn new(tools: Arc<Vec<AlfredoTool>>, todo: Arc<TodoStore>) -> Self {
        Self { tools, todo }
    }

    fn find_tool(&self, name: &str) -> Option<&AlfredoTool> {
        self.tools.iter().find(|t| t.name() == name)
    }
}

#[async_trait]
impl Node for ToolsNode {
    async fn run(&self, state: &mut AgentState) -> Result<(), AgentError> {
        // The store is shared with the todo tool handlers, so the state's
        // view has to be pushed in before execution and pulled back after.
        self.todo.set(state.todo_list.clone());

        let calls = state
            .last_message()
            .map(|m| m.tool_calls().to_vec())
            .unwrap_or_default();

        for call in calls {
            let output = match self.find_tool(&call.name) {
                Some(tool) => {
                    info!(tool = %call.name, "Executing tool");
                    tool.invoke(&call.args).await
                }
                None => format!("Error: Unknown tool: {}", call.name),
            };
            state.push_message(Message::tool(output, call.name, call.id));
        }

        state.todo_list = self.todo.get();
        Ok(())
    }
}

/// Judges the extracted answer against the execution trace
pub struct VerifierNode {
    model: Arc<dyn ChatModel>,
    tools: Arc<Vec<AlfredoTool>>,
    template: Option<String>,
}

impl VerifierNode {
    pub fn new(
        model: Arc<dyn ChatModel>,
        tools: Arc<Vec<AlfredoTool>>,
        template: Option<String>,
    ) -> Self {
        Self {
            model,
            tools,
            template,
        }
    }
}

#[async_trait]
impl Node for VerifierNode {
    async fn run(&self, state: &mut AgentState) -> Result<(), AgentError> {
        // A completion marker with no substance behind it counts as absent.
        let Some(answer) =
            extract_attempt_completion(&state.messages).filter(|a| !a.is_empty())
        else {
            // Nothing to verify; no model call is made.
            state.final_answer = None;
            state.is_verified = false;
            return Ok(());
        };

        let trace = format_execution_trace(&state.messages);
        let prompt = prompts::verification_prompt(
            &state.task,
            &answer,
            &trace,
            &self.tools,
            self.template.as_deref(),
        )?;
        let messages = [Message::human(prompt)];
        let reply = self.model.complete(ChatRequest::new(&messages)).await?;
        let verdict = reply.content().trim().to_string();

        state.is_verified = verdict.starts_with(VERIFIED_PREFIX);
        state.final_answer = Some(answer);
        info!(verified = state.is_verified, "Verification complete");
        state.push_message(Message::human(format!("Verification result: {}", verdict)));
        Ok(())
    }
}

/// Replaces a rejected plan using the verifier's feedback
pub struct ReplanNode {
    model: Arc<dyn ChatModel>,
    tools: Arc<Vec<AlfredoTool>>,
    template: Option<String>,
}

impl ReplanNode {
    pub fn new(
        model: Arc<dyn ChatModel>,
        tools: Arc<Vec<AlfredoTool>>,
        template: Option<String>,
    ) -> Self {
        Self {
            model,
            tools,
            template,
        }
    }
}

#[async_trait]
impl Node for ReplanNode {
    async fn run(&self, state: &mut AgentState) -> Result<(), AgentError> {
        let feedback = state
            .last_message()
            .map(|m| m.content().to_string())
            .unwrap_or_else(|| "No verification feedback available.".to_string());

        let prompt = prompts::replan_prompt(
            &state.task,
            &state.plan,
            &feedback,
            &self.tools,
            self.template.as_deref(),
        )?;
        let messages = [Message::human(prompt)];
        let reply = self.model.complete(ChatRequest::new(&messages)).await?;
        let plan = reply.content().to_string();

        state.plan = plan.clone();
        state.plan_iteration += 1;
        state.final_answer = None;
        state.is_verified = false;
        info!(iteration = state.plan_iteration, "Plan revised");
        state.push_message(Message::ai(format!(
            "Creating improved plan (iteration {}):\n\n{}",
            state.plan_iteration, plan
        )));
        Ok(())
    }
}
