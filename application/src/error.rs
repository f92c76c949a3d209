//! Application-level errors

use thiserror::Error;

use crate::ports::chat_model::ModelError;
use crate::tools::adapter::AdapterError;
use alfredo_domain::prompt::template::TemplateError;

/// Errors surfaced by the agent graph and façade
///
/// Tool failures are NOT here: they stay inside the transcript as
/// `Error: …` tool messages. Only infrastructure and configuration
/// problems abort a run.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("Recursion limit of {0} steps exceeded")]
    RecursionLimitExceeded(usize),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("No run results available; call run() first")]
    NotRun,

    #[error("Unknown graph node: {0}")]
    UnknownNode(String),
}

impl AgentError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AgentError::Cancelled)
    }
}
