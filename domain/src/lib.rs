//! Domain layer for alfredo
//!
//! This crate contains the core data model and logic of the agent harness:
//! tool specifications and results, the variant-aware tool registry, the
//! conversation transcript, agent run state, prompt templates, and the
//! execution-trace formatter. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Plan / Act / Verify
//!
//! A run moves through named steps: a planner drafts a plan, the agent
//! executes it with tools, a verifier judges the answer against the
//! execution trace, and an unverified answer triggers a replan.
//!
//! ## Tool variants
//!
//! Tool specs are registered per model family. Lookups fall back to the
//! `Generic` family, so a provider-specific spec only exists where the
//! wording actually differs.

pub mod core;
pub mod message;
pub mod prompt;
pub mod state;
pub mod todo;
pub mod tool;

// Re-export commonly used types
pub use crate::core::string::truncate;
pub use message::{Message, ToolCallRequest};
pub use state::{
    AgentState, COMPLETION_MARKER, COMPLETION_TOOL_ID, FINAL_COMMAND_PREFIX, FOLLOWUP_MARKER,
    VERIFIED_PREFIX, extract_attempt_completion,
};
pub use todo::{READ_TODO_TOOL_ID, TodoStore, WRITE_TODO_TOOL_ID};
pub use tool::{
    handler::ToolHandler,
    params::ToolParams,
    registry::{HandlerCtor, ToolRegistry},
    result::ToolResult,
    spec::{ModelFamily, ToolParameter, ToolSpec},
    xml::{ToolUse, parse_tool_use},
};

pub use prompt::{
    template::{PromptTemplates, TemplateError, auto_wrap, render_template, uses_placeholders},
    trace::format_execution_trace,
};
