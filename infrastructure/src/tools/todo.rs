//! Todo-list tools backed by the shared store

use std::sync::Arc;

use async_trait::async_trait;

use alfredo_domain::{TodoStore, ToolHandler, ToolParameter, ToolParams, ToolResult, ToolSpec};

pub const WRITE_TODO_LIST: &str = alfredo_domain::WRITE_TODO_TOOL_ID;
pub const READ_TODO_LIST: &str = alfredo_domain::READ_TODO_TOOL_ID;

pub fn write_todo_list_spec() -> ToolSpec {
    ToolSpec::new(WRITE_TODO_LIST, "Write Todo List")
        .with_instructions(
            "Replace the task's todo list. Use markdown checkboxes and keep \
the list current as steps complete.",
        )
        .with_parameter(ToolParameter::new(
            "content",
            true,
            "The full todo list in markdown",
            "- [ ] first step\n- [ ] second step",
        ))
}

pub fn read_todo_list_spec() -> ToolSpec {
    ToolSpec::new(READ_TODO_LIST, "Read Todo List")
        .with_instructions("Read the task's current todo list.")
}

pub struct WriteTodoListHandler {
    store: Arc<TodoStore>,
}

impl WriteTodoListHandler {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolHandler for WriteTodoListHandler {
    fn tool_id(&self) -> &str {
        WRITE_TODO_LIST
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let content = match params.require_str("content") {
            Ok(content) => content,
            Err(e) => return ToolResult::err(e),
        };
        self.store.write(content.clone());
        ToolResult::ok(format!("Todo list updated:\n\n{}", content))
    }
}

pub struct ReadTodoListHandler {
    store: Arc<TodoStore>,
}

impl ReadTodoListHandler {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolHandler for ReadTodoListHandler {
    fn tool_id(&self) -> &str {
        READ_TODO_LIST
    }

    async fn execute(&self, _params: &ToolParams) -> ToolResult {
        match self.store.get() {
            Some(content) => ToolResult::ok(content),
            None => ToolResult::ok("No todo list created yet."),
        }
    }
}
