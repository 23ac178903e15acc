//! Order management tools.
//!
//! Responses are deterministic and schema-conforming; the bodies echo
//! the requested order id so callers can correlate results.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::HandlerError;
use crate::registry::GatewayTool;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OrderInput {
    /// Order identifier
    #[serde(rename = "orderId")]
    pub order_id: String,
}

/// Fetch the details of an order
pub struct GetOrderTool;

impl GatewayTool for GetOrderTool {
    type Input = OrderInput;

    fn name(&self) -> &str {
        "get_order_tool"
    }

    fn description(&self) -> &str {
        "Get the status, items, and total of an order"
    }

    fn handle(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Value, HandlerError>> + Send {
        async move {
            Ok(json!({
                "orderId": input.order_id,
                "status": "processing",
                "items": [
                    {"name": "Item A", "quantity": 2},
                    {"name": "Item B", "quantity": 1},
                ],
                "total": 5000,
            }))
        }
    }
}

/// Update an order.
///
/// Keeps a log of handled order ids so callers (and tests) can verify
/// the dispatcher invoked the handler at most once per request.
pub struct UpdateOrderTool {
    invocations: Arc<Mutex<Vec<String>>>,
}

impl UpdateOrderTool {
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Share the invocation log
    pub fn invocation_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.invocations)
    }
}

impl Default for UpdateOrderTool {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayTool for UpdateOrderTool {
    type Input = OrderInput;

    fn name(&self) -> &str {
        "update_order_tool"
    }

    fn description(&self) -> &str {
        "Update an order and confirm the change"
    }

    fn handle(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Value, HandlerError>> + Send {
        async move {
            self.invocations.lock().push(input.order_id.clone());
            Ok(json!({
                "orderId": input.order_id,
                "status": "updated",
                "message": format!("Order {} has been updated successfully", input.order_id),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_order_body() {
        let result = GetOrderTool
            .handle(OrderInput {
                order_id: "123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result["orderId"], "123");
        assert_eq!(result["status"], "processing");
        assert_eq!(result["items"].as_array().unwrap().len(), 2);
        assert_eq!(result["total"], 5000);
    }

    #[tokio::test]
    async fn test_update_order_logs_each_invocation_once() {
        let tool = UpdateOrderTool::new();
        let log = tool.invocation_log();

        let result = tool
            .handle(OrderInput {
                order_id: "9".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result["status"], "updated");
        assert_eq!(
            result["message"],
            "Order 9 has been updated successfully"
        );
        assert_eq!(log.lock().as_slice(), ["9".to_string()]);
    }
}
