//! Application layer for alfredo
//!
//! Ports for the model gateways, the tool adapter layer, prompt assembly,
//! the plan/act/verify step graph, and the [`Agent`] façade that ties
//! them together.

pub mod agent;
pub mod error;
pub mod graph;
pub mod manual;
pub mod ports;
pub mod prompts;
pub mod tools;

pub use agent::Agent;
pub use error::AgentError;
pub use manual::ManualSession;
pub use ports::{
    chat_model::{ChatModel, ChatRequest, ModelError},
    vision::VisionModel,
};
pub use tools::{
    adapter::{AdaptedTool, AdapterError, create_tool, create_tools},
    alfredo_tool::AlfredoTool,
};
