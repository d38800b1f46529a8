//! OAuth2 credential pair and expiry arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the access token is presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Bearer,
    Basic,
    Client,
}

impl TokenType {
    /// Parse the `token_type` field of a token response. Unrecognized
    /// values fall back to `Bearer`, which is what the API issues.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Self::Basic,
            "client" => Self::Client,
            _ => Self::Bearer,
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer => write!(f, "Bearer"),
            Self::Basic => write!(f, "Basic"),
            Self::Client => write!(f, "Client"),
        }
    }
}

/// An issued OAuth2 credential pair with its owning account identity.
///
/// Created only by a successful token exchange and replaced wholesale on
/// every refresh or re-authentication; never mutated field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Access token attached to authenticated requests.
    pub access_token: String,
    /// Long-lived refresh token used to obtain new access tokens.
    pub refresh_token: String,
    /// Access token lifetime in seconds, as reported at issuance.
    pub expires_in: i64,
    /// Capture time of the token response, from the local clock. The API
    /// does not report an issuance timestamp, so this is set exactly once
    /// at construction.
    pub issued_at: DateTime<Utc>,
    /// Header scheme for the access token.
    pub token_type: TokenType,
    /// Granted scopes, if the provider reported any.
    pub scope: Option<String>,
    /// Numeric id of the owning account.
    pub account_id: i64,
    /// Username of the owning account.
    pub account_username: String,
}

impl Token {
    /// Seconds of validity left at `now`. Negative once expired.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.expires_in - (now - self.issued_at).num_seconds()
    }

    /// Whether the token expires within `threshold_secs` of `now`.
    ///
    /// Strict comparison: a token with exactly `threshold_secs` left is
    /// still considered fresh.
    #[must_use]
    pub fn is_expiring_soon(&self, now: DateTime<Utc>, threshold_secs: i64) -> bool {
        self.remaining_seconds(now) < threshold_secs
    }
}
