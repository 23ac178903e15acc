use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{AuthError, DiscoveryDocument, OAuth2ProviderConfig};

/// Safety margin subtracted from the advertised lifetime so a token is
/// never presented right at its expiry instant.
const EXPIRY_SKEW: chrono::Duration = chrono::Duration::seconds(60);

/// Default timeout for the discovery and token round trips
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A bearer credential obtained via the client-credentials grant.
///
/// Owned exclusively by the [`CredentialIssuer`]; callers receive clones
/// and must come back to the issuer once the credential expires.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Opaque bearer token
    pub access_token: String,
    /// Instant past which this credential must not be used
    pub expires_at: DateTime<Utc>,
    /// Scopes the credential was requested with
    pub scopes: Vec<String>,
}

impl Credential {
    /// True when the credential is within the expiry skew of its lifetime
    pub fn is_expired(&self) -> bool {
        Utc::now() + EXPIRY_SKEW >= self.expires_at
    }
}

/// Wire shape of the token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[allow(dead_code)]
    token_type: Option<String>,
}

/// Issues and caches OAuth2 client-credentials tokens.
///
/// `get_token` returns the cached credential while it is valid and
/// performs exactly one token round trip otherwise. `force_refresh`
/// bypasses the cache; use it after the gateway rejects a token that the
/// issuer still believes is valid.
pub struct CredentialIssuer {
    config: OAuth2ProviderConfig,
    http: reqwest::Client,
    discovery: RwLock<Option<DiscoveryDocument>>,
    cached: RwLock<Option<Credential>>,
}

impl CredentialIssuer {
    /// Create an issuer with the default request timeout
    pub fn new(config: OAuth2ProviderConfig) -> Result<Self, AuthError> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    /// Create an issuer with a caller-specified request timeout
    pub fn with_timeout(
        config: OAuth2ProviderConfig,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http,
            discovery: RwLock::new(None),
            cached: RwLock::new(None),
        })
    }

    /// Return a valid credential, exchanging client credentials for a new
    /// token only when no unexpired one is cached.
    pub async fn get_token(&self) -> Result<Credential, AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some(credential) = cached.as_ref() {
                if !credential.is_expired() {
                    return Ok(credential.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(credential) = cached.as_ref() {
            if !credential.is_expired() {
                return Ok(credential.clone());
            }
        }

        let credential = self.exchange().await?;
        *cached = Some(credential.clone());
        Ok(credential)
    }

    /// Bypass the cache and re-authenticate unconditionally.
    pub async fn force_refresh(&self) -> Result<Credential, AuthError> {
        let mut cached = self.cached.write().await;
        let credential = self.exchange().await?;
        *cached = Some(credential.clone());
        Ok(credential)
    }

    /// Drop the cached credential without fetching a replacement.
    pub async fn invalidate(&self) {
        self.cached.write().await.take();
    }

    /// Resolve the token endpoint, fetching the discovery document on
    /// first use.
    async fn token_endpoint(&self) -> Result<String, AuthError> {
        {
            let discovery = self.discovery.read().await;
            if let Some(doc) = discovery.as_ref() {
                return Ok(doc.token_endpoint.clone());
            }
        }

        let mut discovery = self.discovery.write().await;
        if let Some(doc) = discovery.as_ref() {
            return Ok(doc.token_endpoint.clone());
        }

        let doc = DiscoveryDocument::fetch(&self.http, &self.config.discovery_url).await?;
        let endpoint = doc.token_endpoint.clone();
        *discovery = Some(doc);
        Ok(endpoint)
    }

    /// Perform one client-credentials exchange. No retries.
    async fn exchange(&self) -> Result<Credential, AuthError> {
        let endpoint = self.token_endpoint().await?;

        let mut form = vec![
            ("grant_type", "client_credentials".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("client_secret", self.config.client_secret.clone()),
        ];
        if let Some(scope) = self.config.scope_string() {
            form.push(("scope", scope));
        }

        let response = self
            .http
            .post(&endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Endpoint(format!("{}: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))?;

        Ok(Credential {
            access_token: token.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in),
            scopes: self.config.scopes.clone(),
        })
    }
}

impl std::fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialIssuer")
            .field("discovery_url", &self.config.discovery_url)
            .field("client_id", &self.config.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_expiry_with_skew() {
        let fresh = Credential {
            access_token: "t".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
            scopes: vec![],
        };
        assert!(!fresh.is_expired());

        // Inside the 60 s skew window counts as expired
        let nearly = Credential {
            access_token: "t".to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(30),
            scopes: vec![],
        };
        assert!(nearly.is_expired());

        let stale = Credential {
            access_token: "t".to_string(),
            expires_at: Utc::now() - chrono::Duration::seconds(1),
            scopes: vec![],
        };
        assert!(stale.is_expired());
    }

    #[test]
    fn test_issuer_debug_redacts_secret() {
        let issuer = CredentialIssuer::new(OAuth2ProviderConfig::new(
            "https://auth/.well-known",
            "client",
            "hunter2",
        ))
        .unwrap();

        let shown = format!("{:?}", issuer);
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("[REDACTED]"));
    }
}
