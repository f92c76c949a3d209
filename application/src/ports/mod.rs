//! Ports to the outside world (implemented by the infrastructure layer)

pub mod chat_model;
pub mod vision;

pub use chat_model::{ChatModel, ChatRequest, ModelError};
pub use vision::VisionModel;
