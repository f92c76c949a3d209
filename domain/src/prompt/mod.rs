//! Prompt defaults, template overrides, and trace formatting

pub mod defaults;
pub mod template;
pub mod trace;

pub use template::{PromptTemplates, TemplateError};
pub use trace::format_execution_trace;
