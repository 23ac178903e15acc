//! OAuth2 client-credentials (M2M) credential issuance
//!
//! The gateway authenticates callers with bearer tokens minted by an
//! authorization server described by an OpenID discovery document. This
//! module owns the exchange: it fetches the discovery document, performs
//! the client-credentials grant, and caches the resulting [`Credential`]
//! until shortly before expiry.
//!
//! The issuer performs exactly one network round trip per uncached call
//! and never retries on its own; callers decide whether to retry with
//! [`CredentialIssuer::force_refresh`].
//!
//! ```rust,no_run
//! use toolgate_core::auth::{CredentialIssuer, OAuth2ProviderConfig};
//!
//! # async fn example() -> Result<(), toolgate_core::auth::AuthError> {
//! let config = OAuth2ProviderConfig::new(
//!     "https://auth.example.com/.well-known/openid-configuration",
//!     "my-client-id",
//!     "my-client-secret",
//! )
//! .scopes(["gateway/read", "gateway/write"]);
//!
//! let issuer = CredentialIssuer::new(config)?;
//! let credential = issuer.get_token().await?;
//! println!("bearer {}", credential.access_token);
//! # Ok(())
//! # }
//! ```

mod config;
mod discovery;
mod issuer;

pub use config::OAuth2ProviderConfig;
pub use discovery::DiscoveryDocument;
pub use issuer::{Credential, CredentialIssuer};

use thiserror::Error;

/// Errors that can occur during credential issuance
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("token endpoint unreachable: {0}")]
    Endpoint(String),

    #[error("token request rejected (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed token response: {0}")]
    Malformed(String),

    #[error("invalid auth configuration: {0}")]
    Config(String),
}
