//! # toolgate-gateway
//!
//! Server side of the tool gateway: a registry of typed tools, an
//! invocation dispatcher that resolves prefix-namespaced tool ids, and
//! an authenticated JSON-RPC HTTP endpoint with optional SSE responses.
//!
//! # Example
//!
//! ```rust,no_run
//! use toolgate_gateway::{GatewayRouter, StaticTokenVerifier};
//! use toolgate_gateway::handlers::order_registry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = GatewayRouter::new()
//!     .with_registry(order_registry())
//!     .with_verifier(StaticTokenVerifier::new(["my-token"]))
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod router;
pub(crate) mod state;

// Re-exports
pub use auth::{StaticTokenVerifier, TokenVerifier};
pub use dispatch::{resolve_tool_name, Dispatcher};
pub use error::{BuildError, GatewayError, GatewayResult, HandlerError};
pub use registry::{GatewayTool, ToolHandler, ToolRegistry};
pub use router::GatewayRouter;
