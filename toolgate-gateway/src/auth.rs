//! Inbound bearer token verification.
//!
//! Every request to the gateway endpoint must carry a bearer token; the
//! verifier decides whether it is acceptable. Verification happens
//! before any JSON-RPC processing, so a rejected caller never reaches
//! the dispatcher.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::header::AUTHORIZATION;

use crate::error::GatewayError;
use crate::state::AppState;

/// Decides whether an inbound bearer token is acceptable
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token`, returning a rejection reason on failure
    async fn verify(&self, token: &str) -> Result<(), String>;
}

/// Verifier that accepts a fixed set of tokens.
///
/// Suitable for deployments where the authorization server issues
/// opaque tokens the gateway can enumerate, and for tests.
pub struct StaticTokenVerifier {
    tokens: Vec<String>,
}

impl StaticTokenVerifier {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(|s| s.into()).collect(),
        }
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<(), String> {
        if self.tokens.iter().any(|t| t == token) {
            Ok(())
        } else {
            Err("invalid bearer token".to_string())
        }
    }
}

/// Axum middleware enforcing bearer auth on the gateway endpoint
pub(crate) async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| GatewayError::Unauthorized("missing bearer token".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| GatewayError::Unauthorized("malformed authorization header".to_string()))?;

    state
        .verifier
        .verify(token)
        .await
        .map_err(GatewayError::Unauthorized)?;

    Ok(next.run(request).await)
}
