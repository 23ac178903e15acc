use serde::Deserialize;

use super::AuthError;

/// The subset of an OpenID discovery document the issuer needs.
///
/// Fetched once per issuer and cached; the token endpoint does not move
/// for the lifetime of a process.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryDocument {
    /// Token endpoint for the client-credentials grant
    pub token_endpoint: String,
    /// Issuer identifier, when advertised
    #[serde(default)]
    pub issuer: Option<String>,
}

impl DiscoveryDocument {
    /// Fetch the discovery document from `discovery_url`.
    pub(super) async fn fetch(
        client: &reqwest::Client,
        discovery_url: &str,
    ) -> Result<Self, AuthError> {
        let response = client
            .get(discovery_url)
            .send()
            .await
            .map_err(|e| AuthError::Discovery(format!("{}: {}", discovery_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Discovery(format!(
                "{} returned status {}",
                discovery_url, status
            )));
        }

        response
            .json::<DiscoveryDocument>()
            .await
            .map_err(|e| AuthError::Discovery(format!("invalid discovery document: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_document() {
        let doc: DiscoveryDocument = serde_json::from_str(
            r#"{"token_endpoint": "https://auth.example.com/oauth2/token"}"#,
        )
        .unwrap();

        assert_eq!(doc.token_endpoint, "https://auth.example.com/oauth2/token");
        assert!(doc.issuer.is_none());
    }

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let doc: DiscoveryDocument = serde_json::from_str(
            r#"{
                "issuer": "https://auth.example.com",
                "token_endpoint": "https://auth.example.com/oauth2/token",
                "jwks_uri": "https://auth.example.com/.well-known/jwks.json",
                "response_types_supported": ["code"]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.issuer.as_deref(), Some("https://auth.example.com"));
    }
}
