//! Invocation dispatch: name resolution, handler execution, envelopes.
//!
//! The dispatcher turns a raw tool identifier into a registry lookup and
//! runs the matching handler exactly once. Every failure mode becomes a
//! status envelope in the invocation result so the calling model can see
//! it; nothing at this layer surfaces as an HTTP error.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{json, Value};

use toolgate_core::types::{ToolInvocationRequest, ToolInvocationResult, TOOL_NAME_DELIMITER};

use crate::error::HandlerError;
use crate::registry::ToolRegistry;

/// Strip the registration prefix from a raw tool identifier.
///
/// The tool name is everything after the first occurrence of the
/// delimiter; an identifier without the delimiter is already a plain
/// tool name.
pub fn resolve_tool_name(raw_tool_id: &str) -> &str {
    match raw_tool_id.split_once(TOOL_NAME_DELIMITER) {
        Some((_prefix, name)) => name,
        None => raw_tool_id,
    }
}

/// Dispatches invocation requests against a tool registry
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch one invocation. The handler runs at most once; a handler
    /// panic is contained and reported as a 500 envelope.
    pub async fn dispatch(&self, request: &ToolInvocationRequest) -> ToolInvocationResult {
        let tool_name = resolve_tool_name(&request.raw_tool_id);

        let Some(handler) = self.registry.get(tool_name) else {
            return ToolInvocationResult {
                status_code: 400,
                body: json!({"error": format!("Unknown tool: {}", tool_name)}),
            };
        };

        let input = Value::Object(request.arguments.clone());
        let outcome = AssertUnwindSafe(handler.handle_raw(input))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(body)) => ToolInvocationResult {
                status_code: 200,
                body,
            },
            Ok(Err(HandlerError::InvalidInput(msg))) => ToolInvocationResult {
                status_code: 400,
                body: json!({"error": msg}),
            },
            Ok(Err(HandlerError::Failed(msg))) => ToolInvocationResult {
                status_code: 500,
                body: json!({"error": msg}),
            },
            Err(_panic) => ToolInvocationResult {
                status_code: 500,
                body: json!({"error": "Internal server error"}),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::registry::GatewayTool;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::Map;
    use std::future::Future;

    #[derive(Deserialize, JsonSchema)]
    struct PanicInput {}

    struct PanicTool;

    impl GatewayTool for PanicTool {
        type Input = PanicInput;

        fn name(&self) -> &str {
            "panic_tool"
        }

        fn description(&self) -> &str {
            "Panics"
        }

        fn handle(
            &self,
            _input: Self::Input,
        ) -> impl Future<Output = Result<Value, HandlerError>> + Send {
            async { panic!("boom") }
        }
    }

    fn request(raw_tool_id: &str, arguments: Value) -> ToolInvocationRequest {
        let arguments: Map<String, Value> = arguments.as_object().cloned().unwrap_or_default();
        ToolInvocationRequest::new(raw_tool_id, arguments)
    }

    #[test]
    fn test_resolve_strips_prefix_at_first_delimiter() {
        assert_eq!(
            resolve_tool_name("orderLambdaTarget___get_order_tool"),
            "get_order_tool"
        );
        // Only the first occurrence splits
        assert_eq!(resolve_tool_name("a___b___c"), "b___c");
        // No delimiter means the id is already the tool name
        assert_eq!(resolve_tool_name("get_order_tool"), "get_order_tool");
        // Underscores shorter than the delimiter do not split
        assert_eq!(resolve_tool_name("get__order"), "get__order");
    }

    #[test]
    fn test_resolve_empty_prefix_and_empty_name() {
        assert_eq!(resolve_tool_name("___tool"), "tool");
        assert_eq!(resolve_tool_name("prefix___"), "");
    }

    #[tokio::test]
    async fn test_unknown_tool_envelope() {
        let dispatcher = Dispatcher::new(Arc::new(ToolRegistry::new()));

        let result = dispatcher
            .dispatch(&request("target___nope", json!({})))
            .await;

        assert_eq!(result.status_code, 400);
        assert_eq!(result.body["error"], "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_panicking_handler_contained() {
        let mut registry = ToolRegistry::new();
        registry.register(PanicTool);
        let dispatcher = Dispatcher::new(Arc::new(registry));

        let result = dispatcher
            .dispatch(&request("panic_tool", json!({})))
            .await;

        assert_eq!(result.status_code, 500);
        assert_eq!(result.body["error"], "Internal server error");
    }
}
