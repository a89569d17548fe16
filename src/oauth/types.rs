//! Wire and artifact shapes for the OAuth flow.

use crate::error::SetupError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Treat a token as expired this long before its recorded expiry, so a
/// token handed to a server is never knowingly stale.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Downloaded OAuth client credentials (`client_secrets.json`), in the
/// identity provider's installed-app format. Static for the deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    #[serde(alias = "web")]
    pub installed: ClientSecret,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ClientSecrets {
    /// Load the client-secret artifact. The token flow must not run before
    /// this file exists.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        if !path.exists() {
            return Err(SetupError::MissingClientSecret {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("malformed client secrets at {}", path.display()))
    }
}

/// Generated token artifact (`token.json`), written in the authorized-user
/// shape the external spreadsheet server reads. Regenerated by re-running
/// the consent flow; refreshed over time via the refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// Build the artifact from a token-endpoint response.
    pub fn from_response(
        response: TokenResponse,
        secret: &ClientSecret,
        scopes: &[String],
        previous_refresh_token: Option<String>,
    ) -> Self {
        let expiry = response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs as i64));

        Self {
            token: response.access_token,
            // A refresh response may omit the refresh token; keep the old one
            refresh_token: response.refresh_token.or(previous_refresh_token),
            token_uri: secret.token_uri.clone(),
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            scopes: scopes.to_vec(),
            expiry,
        }
    }

    /// Whether the access token is still usable. Tokens without a recorded
    /// expiry are treated as expired (the flow re-runs rather than handing
    /// out a token of unknown age).
    pub fn is_valid(&self) -> bool {
        match self.expiry {
            Some(expiry) => Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) < expiry,
            None => false,
        }
    }
}

/// Token endpoint success body.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Token endpoint error body.
#[derive(Debug, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// PKCE S256 verifier/challenge pair.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub verifier: String,
    pub challenge: String,
}
