//! Top-level error types for toolgate
//!
//! This module provides a flattened, user-facing error type over the
//! per-module error hierarchies, categorized by how callers need to react.

use thiserror::Error;

use crate::agent::AgentError;
use crate::auth::AuthError;
use crate::provider::ProviderError;
use crate::transport::TransportError;

/// Top-level error type for toolgate operations
///
/// - [`Error::Auth`] - credential issuance failed or the gateway rejected
///   the bearer token twice
/// - [`Error::Transport`] - connectivity or timeout to the gateway/model
/// - [`Error::Protocol`] - malformed discovery/invocation payloads
/// - [`Error::UnknownTool`] - resolved tool name has no registry entry
/// - [`Error::Handler`] - a tool handler raised or returned failure
/// - [`Error::Model`] - language-model completion failed or was unusable
/// - [`Error::Config`] - fix configuration (bad URL, missing variables)
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication failed (invalid or expired credentials)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Connectivity or timeout failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed payload on the wire
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Resolved tool name has no registry entry
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A tool handler failed
    #[error("handler error: {0}")]
    Handler(String),

    /// Model completion failed or returned unusable output
    #[error("model error: {0}")]
    Model(String),

    /// Configuration error (bad gateway URL, missing parameters)
    #[error("configuration error: {0}")]
    Config(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Returns true if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Returns true if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if this is a protocol error
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Returns true if this is an unknown-tool error.
    ///
    /// The pipeline itself feeds unknown-tool envelopes back to the
    /// model; this variant is for callers that classify envelope bodies
    /// into a surfaced error.
    pub fn is_unknown_tool(&self) -> bool {
        matches!(self, Self::UnknownTool(_))
    }

    /// Returns true if this is a handler error.
    ///
    /// Like [`Error::is_unknown_tool`], handler failures normally travel
    /// as dispatch envelopes; callers classifying those bodies construct
    /// this variant.
    pub fn is_handler(&self) -> bool {
        matches!(self, Self::Handler(_))
    }

    /// Returns true if this is a model error
    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    /// Returns true if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Self::Auth(err.to_string())
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Auth(msg) => Self::Auth(msg),
            TransportError::Protocol(msg) => Self::Protocol(msg),
            TransportError::Connect(msg) | TransportError::Network(msg) => Self::Transport(msg),
        }
    }
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Authentication(msg) => Self::Auth(msg),
            ProviderError::Network(msg) => Self::Transport(msg),
            ProviderError::Model(msg) => Self::Model(msg),
            ProviderError::Configuration(msg) => Self::Config(msg),
            ProviderError::Other(msg) => Self::Other(msg),
        }
    }
}

impl From<AgentError> for Error {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Provider(e) => e.into(),
            AgentError::Transport(e) => e.into(),
            AgentError::NoTools => {
                Self::Protocol("tool discovery returned no tools".to_string())
            }
            AgentError::NoResponse => Self::Model("model returned no response".to_string()),
            AgentError::IterationLimit(limit) => Self::Model(format!(
                "tool-calling loop exceeded the maximum of {} model calls",
                limit
            )),
            AgentError::UnexpectedStopReason(reason) => {
                Self::Model(format!("unexpected stop reason: {}", reason))
            }
        }
    }
}

/// Result type for toolgate operations
pub type Result<T> = std::result::Result<T, Error>;
