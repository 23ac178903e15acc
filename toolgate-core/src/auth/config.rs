use super::AuthError;

/// Configuration for an OAuth2 client-credentials provider.
///
/// The discovery URL, client id, and client secret are produced by the
/// bootstrap tooling; the scope list may be empty, which means "default
/// client scopes" on the token request.
#[derive(Debug, Clone)]
pub struct OAuth2ProviderConfig {
    /// OpenID discovery document URL
    pub discovery_url: String,
    /// Confidential client id
    pub client_id: String,
    /// Confidential client secret
    pub client_secret: String,
    /// Requested scopes; empty means default client scopes
    pub scopes: Vec<String>,
}

impl OAuth2ProviderConfig {
    /// Create a new provider configuration with no scopes
    pub fn new(
        discovery_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            discovery_url: discovery_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: Vec::new(),
        }
    }

    /// Set the requested scopes
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Read the provider configuration from the environment variables the
    /// bootstrap scripts persist:
    ///
    /// - `TOOLGATE_DISCOVERY_URL`
    /// - `TOOLGATE_CLIENT_ID`
    /// - `TOOLGATE_CLIENT_SECRET`
    /// - `TOOLGATE_SCOPES` (optional, space-delimited)
    pub fn from_env() -> Result<Self, AuthError> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| AuthError::Config(format!("{} environment variable not set", name)))
        };

        let scopes = std::env::var("TOOLGATE_SCOPES")
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Ok(Self {
            discovery_url: var("TOOLGATE_DISCOVERY_URL")?,
            client_id: var("TOOLGATE_CLIENT_ID")?,
            client_secret: var("TOOLGATE_CLIENT_SECRET")?,
            scopes,
        })
    }

    /// Space-delimited scope string for the token request, or `None` when
    /// the scope list is empty.
    pub(crate) fn scope_string(&self) -> Option<String> {
        if self.scopes.is_empty() {
            None
        } else {
            Some(self.scopes.join(" "))
        }
    }
}

impl std::fmt::Display for OAuth2ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret
        write!(
            f,
            "OAuth2ProviderConfig {{ discovery_url: {}, client_id: {}, scopes: [{}] }}",
            self.discovery_url,
            self.client_id,
            self.scopes.join(", ")
        )
    }
}
