//! OAuth2 grant exchanges against the token endpoint.
//!
//! Both exchanges are stateless: they perform one `POST /oauth2/token` and
//! hand the resulting [`Token`] back to the caller, which is responsible for
//! installing it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config;
use crate::error::AuthError;
use crate::models::envelope;
use crate::models::token::{Token, TokenType};

/// Performs the two token-acquisition protocols.
///
/// Trait seam so the auth manager can be driven by a fake in tests.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchange a one-time authorization code for a token pair.
    ///
    /// Codes are only valid for minutes after the user grants access; a
    /// provider rejection comes back as [`AuthError::ExchangeFailed`] with
    /// the provider's HTTP status so callers can tell "get a new code"
    /// apart from other failures.
    async fn exchange_authorization_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<Token, AuthError>;

    /// Exchange a refresh token for a fresh token pair.
    async fn exchange_refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Token, AuthError>;
}

/// Wire shape of a successful token-endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    account_id: i64,
    account_username: String,
}

impl TokenResponse {
    fn into_token(self, issued_at: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
            issued_at,
            token_type: self
                .token_type
                .as_deref()
                .map(TokenType::parse)
                .unwrap_or_default(),
            scope: self.scope,
            account_id: self.account_id,
            account_username: self.account_username,
        }
    }
}

/// HTTP implementation of [`TokenExchanger`].
pub struct OAuthExchanger {
    client: reqwest::Client,
    base_url: String,
}

impl OAuthExchanger {
    /// Create an exchanger targeting `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn exchange(&self, form: &[(&str, &str)]) -> Result<Token, AuthError> {
        let url = config::token_url(&self.base_url);

        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::ExchangeFailed {
                status: 0,
                message: format!("token request failed: {}", e),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::ExchangeFailed {
                status: 0,
                message: format!("failed to read token response: {}", e),
            })?;

        if status != 200 {
            let message = envelope::provider_message(&body)
                .unwrap_or_else(|| format!("token endpoint returned HTTP {}", status));
            warn!(status, "Token exchange rejected");
            return Err(AuthError::ExchangeFailed { status, message });
        }

        let data: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::ExchangeFailed {
                status: 0,
                message: format!("failed to parse token response: {}", e),
            })?;

        if data.access_token.is_empty() {
            return Err(AuthError::ExchangeFailed {
                status: 0,
                message: "response does not contain an access token".into(),
            });
        }

        debug!(account = data.account_username.as_str(), "Token exchange succeeded");
        // issued_at is set here, at response receipt, from the local clock;
        // the API does not report an issuance timestamp.
        Ok(data.into_token(Utc::now()))
    }
}

#[async_trait]
impl TokenExchanger for OAuthExchanger {
    async fn exchange_authorization_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<Token, AuthError> {
        debug!("Exchanging authorization code");
        self.exchange(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "authorization_code"),
            ("code", code),
        ])
        .await
    }

    async fn exchange_refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Token, AuthError> {
        debug!("Exchanging refresh token");
        self.exchange(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }
}
