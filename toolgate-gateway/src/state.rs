//! Application state for the gateway server.

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::dispatch::Dispatcher;

/// Shared state cloned into each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Invocation dispatcher over the tool registry
    pub dispatcher: Dispatcher,
    /// Inbound bearer token verifier
    pub verifier: Arc<dyn TokenVerifier>,
    /// Registration prefix prepended to advertised tool names
    pub namespace: Option<String>,
}
