//! Authenticated streaming client for the tool gateway
//!
//! The gateway speaks a small JSON-RPC 2.0 surface over HTTP POST:
//! `initialize`, `tools/list`, and `tools/call`. Responses arrive either
//! as plain JSON or as a Server-Sent-Events stream whose `data:` frames
//! carry the serialized response, possibly split across frames. The
//! client reassembles frames in arrival order and always consumes a
//! stream to completion before returning.
//!
//! Every request carries the current bearer token. When the gateway
//! answers 401/403 the client refreshes the credential exactly once and
//! retries; a second rejection surfaces as an auth failure.

mod client;
mod wire;

pub use client::GatewayClient;
pub use wire::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, JSONRPC_VERSION,
    METHOD_NOT_FOUND,
};

use thiserror::Error;

/// Errors that can occur on the gateway transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The session could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Connectivity failure or timeout on an established session
    #[error("network error: {0}")]
    Network(String),

    /// The gateway rejected the bearer token after a refresh
    #[error("gateway rejected credentials: {0}")]
    Auth(String),

    /// Malformed frame or payload on the wire
    #[error("protocol error: {0}")]
    Protocol(String),
}
