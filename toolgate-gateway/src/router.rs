//! Router builder and the JSON-RPC endpoint handler.
//!
//! The gateway exposes a single POST endpoint speaking JSON-RPC 2.0 with
//! three methods: `initialize`, `tools/list`, and `tools/call`. Clients
//! that send `Accept: text/event-stream` receive the response as SSE
//! `data:` frames; the serialized response may be split across frames
//! and must be reassembled in arrival order.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::ACCEPT, HeaderMap},
    middleware,
    response::sse::{Event, Sse},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use toolgate_core::transport::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND,
};
use toolgate_core::types::ToolInvocationRequest;

use crate::auth::{require_bearer, TokenVerifier};
use crate::dispatch::Dispatcher;
use crate::error::BuildError;
use crate::registry::{GatewayTool, ToolRegistry};
use crate::state::AppState;

/// Maximum bytes per SSE data frame before the payload is split
const SSE_CHUNK_BYTES: usize = 512;

/// Builder for the gateway HTTP router.
///
/// # Example
///
/// ```rust,no_run
/// use toolgate_gateway::{GatewayRouter, StaticTokenVerifier};
/// use toolgate_gateway::handlers::order_registry;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let app = GatewayRouter::new()
///     .with_registry(order_registry())
///     .with_verifier(StaticTokenVerifier::new(["my-token"]))
///     .build()?;
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub struct GatewayRouter {
    registry: ToolRegistry,
    verifier: Option<Arc<dyn TokenVerifier>>,
    path: String,
    namespace: Option<String>,
    cors: bool,
}

impl GatewayRouter {
    /// Create a builder with an empty registry, serving at `/mcp`
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
            verifier: None,
            path: "/mcp".to_string(),
            namespace: None,
            cors: false,
        }
    }

    /// Replace the registry wholesale
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a single tool
    pub fn register<T: GatewayTool + 'static>(mut self, tool: T) -> Self {
        self.registry.register(tool);
        self
    }

    /// Set the inbound token verifier (required)
    pub fn with_verifier(mut self, verifier: impl TokenVerifier + 'static) -> Self {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    /// Advertise tools under a registration prefix.
    ///
    /// Listed tool names become `<prefix>___<name>`; the dispatcher
    /// strips the prefix on invocation, so registered handlers keep
    /// their plain names.
    pub fn with_namespace(mut self, prefix: impl Into<String>) -> Self {
        self.namespace = Some(prefix.into());
        self
    }

    /// Serve the endpoint at a custom path instead of `/mcp`
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Enable permissive CORS for browser-based callers
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Build the router.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTools`] when nothing is registered and
    /// [`BuildError::NoVerifier`] when no verifier was configured.
    pub fn build(self) -> Result<Router, BuildError> {
        if self.registry.is_empty() {
            return Err(BuildError::NoTools);
        }
        let verifier = self.verifier.ok_or(BuildError::NoVerifier)?;

        let state = AppState {
            dispatcher: Dispatcher::new(Arc::new(self.registry)),
            verifier,
            namespace: self.namespace,
        };

        let mut router = Router::new()
            .route(&self.path, post(mcp_handler))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_bearer,
            ));

        if self.cors {
            router = router.layer(CorsLayer::permissive());
        }
        router = router.layer(TraceLayer::new_for_http());

        Ok(router.with_state(state))
    }
}

impl Default for GatewayRouter {
    fn default() -> Self {
        Self::new()
    }
}

async fn mcp_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    let response = handle_request(&state, request).await;

    if wants_event_stream(&headers) {
        let payload = match serde_json::to_string(&response) {
            Ok(payload) => payload,
            Err(_) => return Json(response).into_response(),
        };
        let frames = sse_chunks(&payload)
            .into_iter()
            .map(|chunk| Ok::<_, Infallible>(Event::default().data(chunk)));
        return Sse::new(tokio_stream::iter(frames)).into_response();
    }

    Json(response).into_response()
}

async fn handle_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id;
    match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2025-03-26",
                "serverInfo": {
                    "name": "toolgate-gateway",
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": {"tools": {}},
            }),
        ),
        "tools/list" => {
            let mut descriptors = state.dispatcher.registry().descriptors();
            if let Some(prefix) = &state.namespace {
                for descriptor in &mut descriptors {
                    descriptor.name = format!(
                        "{}{}{}",
                        prefix,
                        toolgate_core::types::TOOL_NAME_DELIMITER,
                        descriptor.name
                    );
                }
            }
            JsonRpcResponse::success(id, json!({"tools": descriptors}))
        }
        "tools/call" => {
            let params = request.params.unwrap_or(Value::Null);
            let Some(name) = params.get("name").and_then(Value::as_str) else {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    "tools/call requires a 'name' parameter",
                );
            };
            let arguments = params
                .get("arguments")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            let invocation = ToolInvocationRequest::new(name, arguments);
            let result = state.dispatcher.dispatch(&invocation).await;
            match serde_json::to_value(&result) {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("unserializable result: {}", e),
                ),
            }
        }
        other => {
            JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other))
        }
    }
}

fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("text/event-stream"))
        .unwrap_or(false)
}

/// Split a compact JSON payload into frame-sized pieces at char
/// boundaries. Compact JSON carries no raw newlines, so each piece is a
/// valid SSE data line.
fn sse_chunks(payload: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for ch in payload.chars() {
        current.push(ch);
        if current.len() >= SSE_CHUNK_BYTES {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
