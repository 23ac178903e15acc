use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde_json::{json, Value};

use crate::auth::CredentialIssuer;
use crate::events::{AgentEvent, AgentHook};
use crate::types::{ToolDescriptor, ToolInvocationRequest, ToolInvocationResult};

use super::wire::{JsonRpcRequest, JsonRpcResponse};
use super::TransportError;

/// Default timeout for a single gateway round trip
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the tool gateway's JSON-RPC endpoint.
///
/// All requests go to a single URL; the method field selects the
/// operation. The client owns no conversation state beyond a monotonic
/// request id counter, so it is safe to share behind an `Arc`.
pub struct GatewayClient {
    http: reqwest::Client,
    endpoint: String,
    issuer: Arc<CredentialIssuer>,
    next_id: AtomicU64,
    hooks: Vec<Arc<dyn AgentHook>>,
}

impl GatewayClient {
    /// Open a session against `endpoint`, verifying reachability and
    /// credentials with an `initialize` exchange.
    pub async fn connect(
        endpoint: impl Into<String>,
        issuer: Arc<CredentialIssuer>,
    ) -> Result<Self, TransportError> {
        Self::connect_with_timeout(endpoint, issuer, DEFAULT_TIMEOUT).await
    }

    /// Open a session with a caller-specified round-trip timeout.
    pub async fn connect_with_timeout(
        endpoint: impl Into<String>,
        issuer: Arc<CredentialIssuer>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint)
            .map_err(|e| TransportError::Connect(format!("invalid gateway URL {}: {}", endpoint, e)))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connect(format!("failed to build HTTP client: {}", e)))?;

        let client = Self {
            http,
            endpoint,
            issuer,
            next_id: AtomicU64::new(1),
            hooks: Vec::new(),
        };

        client
            .rpc(
                "initialize",
                Some(json!({
                    "protocolVersion": "2025-03-26",
                    "clientInfo": {
                        "name": "toolgate",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                })),
            )
            .await
            .map_err(|e| match e {
                // Failures during session establishment read better as
                // connection errors than as mid-session network errors.
                TransportError::Network(msg) => TransportError::Connect(msg),
                other => other,
            })?;

        Ok(client)
    }

    /// Register a hook to observe transport events
    pub fn add_hook(&mut self, hook: Arc<dyn AgentHook>) {
        self.hooks.push(hook);
    }

    /// Fetch the descriptors of every tool the gateway exposes.
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, TransportError> {
        let result = self.rpc("tools/list", None).await?;
        let tools = result
            .get("tools")
            .cloned()
            .ok_or_else(|| TransportError::Protocol("tools/list result missing 'tools'".to_string()))?;
        serde_json::from_value(tools)
            .map_err(|e| TransportError::Protocol(format!("invalid tool descriptor: {}", e)))
    }

    /// Invoke a tool by its raw (possibly prefixed) identifier.
    ///
    /// Dispatch failures the gateway reports as status envelopes come
    /// back as an `Ok` result with a non-2xx `status_code`; only wire and
    /// auth failures surface as errors.
    pub async fn invoke_tool(
        &self,
        request: &ToolInvocationRequest,
    ) -> Result<ToolInvocationResult, TransportError> {
        let result = self
            .rpc(
                "tools/call",
                Some(json!({
                    "name": request.raw_tool_id,
                    "arguments": request.arguments,
                })),
            )
            .await?;
        serde_json::from_value(result)
            .map_err(|e| TransportError::Protocol(format!("invalid tool call result: {}", e)))
    }

    /// Perform one JSON-RPC round trip, refreshing the credential and
    /// retrying exactly once if the gateway rejects the bearer token.
    async fn rpc(&self, method: &str, params: Option<Value>) -> Result<Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        let token = self
            .issuer
            .get_token()
            .await
            .map_err(|e| TransportError::Auth(e.to_string()))?;

        let mut response = self.send(&request, &token.access_token).await?;

        if matches!(response.status().as_u16(), 401 | 403) {
            let refreshed = self
                .issuer
                .force_refresh()
                .await
                .map_err(|e| TransportError::Auth(e.to_string()))?;
            self.emit(AgentEvent::CredentialRefreshed);

            response = self.send(&request, &refreshed.access_token).await?;
            if matches!(response.status().as_u16(), 401 | 403) {
                return Err(TransportError::Auth(format!(
                    "gateway returned status {} after credential refresh",
                    response.status()
                )));
            }
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Network(format!(
                "gateway returned status {}: {}",
                status, body
            )));
        }

        let payload = self.read_body(response).await?;

        let envelope: JsonRpcResponse = serde_json::from_str(&payload)
            .map_err(|e| TransportError::Protocol(format!("invalid response envelope: {}", e)))?;

        if envelope.id != id {
            return Err(TransportError::Protocol(format!(
                "response id {} does not match request id {}",
                envelope.id, id
            )));
        }
        if let Some(error) = envelope.error {
            return Err(TransportError::Protocol(format!(
                "{} (code {})",
                error.message, error.code
            )));
        }
        envelope
            .result
            .ok_or_else(|| TransportError::Protocol("response missing result".to_string()))
    }

    async fn send(
        &self,
        request: &JsonRpcRequest,
        token: &str,
    ) -> Result<reqwest::Response, TransportError> {
        self.http
            .post(&self.endpoint)
            .bearer_auth(token)
            .header("accept", "application/json, text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("{}: {}", self.endpoint, e)))
    }

    /// Read the response body, reassembling SSE `data:` frames in arrival
    /// order when the gateway streams the response.
    async fn read_body(&self, response: reqwest::Response) -> Result<String, TransportError> {
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !content_type.starts_with("text/event-stream") {
            return response
                .text()
                .await
                .map_err(|e| TransportError::Network(e.to_string()));
        }

        let mut stream = response.bytes_stream().eventsource();
        let mut payload = String::new();
        while let Some(event) = stream.next().await {
            let event =
                event.map_err(|e| TransportError::Protocol(format!("invalid SSE frame: {}", e)))?;
            payload.push_str(&event.data);
        }
        Ok(payload)
    }

    fn emit(&self, event: AgentEvent) {
        for hook in &self.hooks {
            hook.on_event(&event);
        }
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
