use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC protocol version carried on every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Build a request envelope for `method` with optional `params`
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response envelope.
///
/// Exactly one of `result` and `error` is present. Tool dispatch failures
/// the model should see (unknown tool, handler errors) travel inside
/// `result` as status envelopes; `error` is reserved for protocol-level
/// failures such as an unrecognized method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a success response carrying `result`
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response
    pub fn error(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// A JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Method not found, per the JSON-RPC 2.0 specification
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Invalid params, per the JSON-RPC 2.0 specification
pub const INVALID_PARAMS: i64 = -32602;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_absent_params() {
        let request = JsonRpcRequest::new(1, "tools/list", None);
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}));
    }

    #[test]
    fn test_response_success_round_trip() {
        let response = JsonRpcResponse::success(7, json!({"tools": []}));
        let wire = serde_json::to_string(&response).unwrap();
        let parsed: JsonRpcResponse = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed.id, 7);
        assert!(parsed.error.is_none());
        assert_eq!(parsed.result.unwrap()["tools"], json!([]));
    }

    #[test]
    fn test_response_error_shape() {
        let response = JsonRpcResponse::error(3, METHOD_NOT_FOUND, "no such method");
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "no such method");
    }
}
