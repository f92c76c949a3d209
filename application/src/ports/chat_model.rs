//! Chat-model gateway port

use async_trait::async_trait;
use thiserror::Error;

use alfredo_domain::Message;

/// Errors from a model gateway
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

/// One chat-completion request
///
/// `tools` carries JSON tool schemas in the adapter's neutral shape
/// (`{"name", "description", "input_schema"}`); gateways convert to their
/// provider's wire format.
pub struct ChatRequest<'a> {
    pub system: Option<&'a str>,
    pub messages: &'a [Message],
    pub tools: &'a [serde_json::Value],
}

impl<'a> ChatRequest<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            system: None,
            messages,
            tools: &[],
        }
    }

    pub fn with_system(mut self, system: &'a str) -> Self {
        self.system = Some(system);
        self
    }

    pub fn with_tools(mut self, tools: &'a [serde_json::Value]) -> Self {
        self.tools = tools;
        self
    }
}

/// Gateway to a chat-completion model (Port)
///
/// Returns the assistant reply as an ai [`Message`], with any requested
/// tool calls already parsed.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<Message, ModelError>;

    /// Identifier for logging
    fn model_name(&self) -> &str;
}
