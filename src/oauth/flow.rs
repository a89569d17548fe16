//! Authorization URL assembly and the code/refresh token exchanges.

use crate::error::SetupError;
use crate::oauth::types::{
    ClientSecret, PkceChallenge, TokenErrorResponse, TokenResponse,
};
use crate::Result;
use url::Url;

pub struct OAuthFlow {
    secret: ClientSecret,
    scopes: Vec<String>,
    client: reqwest::Client,
}

impl OAuthFlow {
    pub fn new(secret: ClientSecret, scopes: Vec<String>) -> Self {
        Self {
            secret,
            scopes,
            client: reqwest::Client::new(),
        }
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn secret(&self) -> &ClientSecret {
        &self.secret
    }

    /// Build the browser-facing authorization URL.
    ///
    /// `access_type=offline` + `prompt=consent` so every run yields a fresh
    /// refresh token: regenerating replaces the whole token artifact.
    pub fn authorize_url(
        &self,
        redirect_uri: &str,
        state: &str,
        pkce: &PkceChallenge,
    ) -> Result<String> {
        let mut url = Url::parse(&self.secret.auth_uri)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.secret.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("state", state)
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("code_challenge_method", "S256")
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");
        Ok(url.to_string())
    }

    /// Exchange an authorization grant for an access/refresh token pair.
    pub async fn exchange(
        &self,
        code: &str,
        redirect_uri: &str,
        verifier: &str,
    ) -> Result<TokenResponse, SetupError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", &self.secret.client_id),
            ("client_secret", &self.secret.client_secret),
            ("code_verifier", verifier),
        ])
        .await
    }

    /// Obtain a fresh access token from a stored refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, SetupError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.secret.client_id),
            ("client_secret", &self.secret.client_secret),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, SetupError> {
        let response = self
            .client
            .post(&self.secret.token_uri)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<TokenResponse>().await?);
        }

        // The provider's error body distinguishes a declined grant from a
        // transport-level failure
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(err) if matches!(err.error.as_str(), "access_denied" | "invalid_grant") => {
                Err(SetupError::AuthorizationDenied {
                    reason: err
                        .error_description
                        .unwrap_or(err.error),
                })
            }
            Ok(err) => Err(SetupError::Network {
                reason: format!(
                    "token endpoint returned {}: {}",
                    status,
                    err.error_description.unwrap_or(err.error)
                ),
            }),
            Err(_) => Err(SetupError::Network {
                reason: format!("token endpoint returned {}", status),
            }),
        }
    }
}
