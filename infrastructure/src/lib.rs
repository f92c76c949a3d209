//! Infrastructure layer for alfredo
//!
//! Adapters behind the application ports: the built-in tool handlers and
//! their registry wiring, the OpenAI-compatible model gateway,
//! configuration loading, and the JSONL run logger.

pub mod config;
pub mod llm;
pub mod logging;
pub mod tools;

pub use config::FileConfig;
pub use llm::openai::OpenAiChatModel;
pub use logging::jsonl::JsonlRunLogger;
pub use tools::builtin_registry;
