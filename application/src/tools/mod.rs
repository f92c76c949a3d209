//! Tool adaptation: from registry specs to model-facing tools

pub mod adapter;
pub mod alfredo_tool;

pub use adapter::{AdaptedTool, AdapterError, create_tool, create_tools};
pub use alfredo_tool::AlfredoTool;
