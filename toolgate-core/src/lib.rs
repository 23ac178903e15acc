//! # toolgate-core
//!
//! Client-side pipeline for an authenticated tool gateway: OAuth2
//! client-credentials issuance, a streaming JSON-RPC transport, a model
//! provider seam, and the agent loop that ties them together.
//!
//! ## Quick Start
//!
//! ```ignore
//! use toolgate_core::{AnthropicProvider, OAuth2ProviderConfig, Orchestrator, OrchestratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> toolgate_core::Result<()> {
//!     let auth = OAuth2ProviderConfig::from_env()?;
//!     let provider = AnthropicProvider::from_env("claude-sonnet-4-20250514")?;
//!
//!     let config = OrchestratorConfig::new("https://gateway.example.com/mcp", auth)
//!         .with_system_prompt("You are an order management assistant.");
//!     let orchestrator = Orchestrator::new(provider, config);
//!
//!     let response = orchestrator.handle("What is the status of order 123?").await?;
//!     println!("{}", response);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline stages
//!
//! - [`auth`] - OAuth2 discovery, client-credentials exchange, token cache
//! - [`transport`] - JSON-RPC over HTTP with SSE reassembly and one
//!   refresh-and-retry on credential rejection
//! - [`provider`] - the [`ModelProvider`] seam and the Anthropic
//!   Messages API implementation
//! - [`agent`] - the bounded tool-calling loop
//! - [`orchestrator`] - wires one prompt through the stages above

pub mod agent;
pub mod auth;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod provider;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use agent::{
    Agent, AgentBuilder, AgentError, AgentResponse, DynTool, GatewayToolAdapter, ToolCallInfo,
    DEFAULT_MAX_ITERATIONS,
};
pub use auth::{AuthError, Credential, CredentialIssuer, DiscoveryDocument, OAuth2ProviderConfig};
pub use error::{Error, Result};
pub use events::{AgentEvent, AgentHook, RunPhase};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use provider::{AnthropicProvider, ModelProvider, ModelResponse, ProviderError};
pub use transport::{GatewayClient, TransportError};
pub use types::{
    ContentBlock, Message, Role, StopReason, ToolDescriptor, ToolInvocationRequest,
    ToolInvocationResult, ToolResultBlock, ToolResultStatus, ToolUseBlock, TOOL_NAME_DELIMITER,
};
