//! Shared todo-list store

use std::sync::Mutex;

/// Tool id that replaces the todo list
pub const WRITE_TODO_TOOL_ID: &str = "write_todo_list";

/// Tool id that reads the todo list back
pub const READ_TODO_TOOL_ID: &str = "read_todo_list";

/// Todo list shared between the agent loop and the todo tools
///
/// Created by the caller and passed as an `Arc` to both the registry
/// wiring and the agent, which syncs it in and out of
/// [`AgentState::todo_list`](crate::state::AgentState) around tool
/// execution.
#[derive(Debug, Default)]
pub struct TodoStore {
    content: Mutex<Option<String>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.content.lock().unwrap().clone()
    }

    pub fn set(&self, content: Option<String>) {
        *self.content.lock().unwrap() = content;
    }

    pub fn write(&self, content: impl Into<String>) {
        self.set(Some(content.into()));
    }

    pub fn clear(&self) {
        self.set(None);
    }
}
