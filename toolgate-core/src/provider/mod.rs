//! Model providers for LLM interactions
//!
//! This module contains the [`ModelProvider`] trait the agent loop is
//! written against, plus the Anthropic Messages API implementation.

pub mod anthropic;

pub use anthropic::AnthropicProvider;

use crate::types::{Message, StopReason, ToolDescriptor};

/// A complete response from a model call
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// The assistant message, possibly containing tool use blocks
    pub message: Message,
    /// Why the model stopped generating
    pub stop_reason: StopReason,
}

/// Error types for model providers
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Authentication or authorization failed
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network or connectivity issues
    #[error("network error: {0}")]
    Network(String),

    /// Model-specific errors (content filtered, context too long)
    #[error("model error: {0}")]
    Model(String),

    /// Invalid configuration (bad model id, missing parameters)
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Other provider-specific errors
    #[error("{0}")]
    Other(String),
}

/// Trait for model providers
///
/// Abstracts over LLM backends so the agent loop can run against the real
/// Messages API or a scripted mock in tests.
#[async_trait::async_trait]
pub trait ModelProvider: Send + Sync {
    /// Model name for display
    fn name(&self) -> &str;

    /// Send the conversation to the model and get a response
    ///
    /// # Arguments
    /// * `messages` - The conversation history
    /// * `tools` - Tools the model may request
    /// * `system_prompt` - Optional system prompt
    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDescriptor>,
        system_prompt: Option<String>,
    ) -> Result<ModelResponse, ProviderError>;
}

// Forward through Arc so agents can share a provider
#[async_trait::async_trait]
impl ModelProvider for std::sync::Arc<dyn ModelProvider> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDescriptor>,
        system_prompt: Option<String>,
    ) -> Result<ModelResponse, ProviderError> {
        (**self).generate(messages, tools, system_prompt).await
    }
}
