use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::transport::TransportError;

/// Errors that can occur during agent execution
#[derive(Debug, Error)]
pub enum AgentError {
    /// Model provider error
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Gateway transport error during tool execution or discovery
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Tool discovery returned an empty tool set
    #[error("tool discovery returned no tools")]
    NoTools,

    /// Model produced no usable text response
    #[error("model returned no response")]
    NoResponse,

    /// The tool-calling loop hit its model call bound without finishing
    #[error("tool-calling loop exceeded the maximum of {0} model calls")]
    IterationLimit(usize),

    /// Model stopped for a reason the loop cannot act on
    #[error("unexpected stop reason: {0}")]
    UnexpectedStopReason(String),
}

/// Response from a completed agent run
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// The final text response from the agent
    pub text: String,
    /// All tool calls made during this run
    pub tool_calls: Vec<ToolCallInfo>,
    /// Number of model calls made
    pub model_calls: usize,
    /// Total execution time
    pub duration: Duration,
}

impl std::fmt::Display for AgentResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl PartialEq<&str> for AgentResponse {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl From<AgentResponse> for String {
    fn from(response: AgentResponse) -> Self {
        response.text
    }
}

/// Record of a single tool call made during a run
#[derive(Debug, Clone)]
pub struct ToolCallInfo {
    /// Raw tool identifier as the model requested it
    pub name: String,
    /// Input parameters (as JSON)
    pub input: Value,
    /// Result payload fed back to the model
    pub output: Value,
    /// Whether the tool reported success
    pub success: bool,
    /// Execution duration
    pub duration: Duration,
}
