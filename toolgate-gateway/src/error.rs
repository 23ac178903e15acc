//! Error types for the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Errors that can occur when building a gateway router.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No tools were registered.
    #[error("No tools registered. Call .register() before .build()")]
    NoTools,

    /// No token verifier was configured.
    #[error("No token verifier configured. Call .with_verifier() before .build()")]
    NoVerifier,
}

/// Errors a tool handler can report.
///
/// `InvalidInput` maps to a 400 envelope, everything else to 500. Both
/// travel back to the caller inside the invocation result, never as an
/// HTTP error.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The arguments did not match the tool's input schema
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The handler ran and failed
    #[error("{0}")]
    Failed(String),
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<String> for HandlerError {
    fn from(s: String) -> Self {
        Self::Failed(s)
    }
}

impl From<&str> for HandlerError {
    fn from(s: &str) -> Self {
        Self::Failed(s.to_string())
    }
}

/// Errors that can occur at the HTTP layer of the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Missing or invalid bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed request from the client.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal gateway error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GatewayError::Unauthorized(e) => (StatusCode::UNAUTHORIZED, e.clone()),
            GatewayError::InvalidRequest(e) => (StatusCode::BAD_REQUEST, e.clone()),
            GatewayError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.clone()),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Result type alias for gateway HTTP operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_unauthorized_shape() {
        let response = GatewayError::Unauthorized("missing bearer token".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 401);
        assert_eq!(body["error"], "missing bearer token");
    }

    #[test]
    fn test_handler_error_from_serde() {
        let err: HandlerError =
            serde_json::from_str::<u32>("\"not a number\"").unwrap_err().into();
        assert!(matches!(err, HandlerError::InvalidInput(_)));
    }
}
