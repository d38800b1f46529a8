//! Error types for the Imgur client.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure talking to the Imgur API.
#[derive(Debug, Error)]
pub enum Error {
    /// The API rejected a request, or the response envelope was malformed.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication lifecycle failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Transport-level failure before any HTTP status was received.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Client misconfiguration (missing credentials, bad base URL).
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures specific to the authentication lifecycle.
///
/// Distinguished from [`Error::Api`] so callers can tell "your credentials
/// are the problem, re-authorize" from generic API failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An authenticated-only operation was invoked while anonymous.
    #[error("not authenticated: supply an authorization code or refresh token first")]
    NotAuthenticated,

    /// A refresh was required but no refresh token is stored.
    #[error("no refresh token available: supply an authorization code or refresh token")]
    MissingRefreshToken,

    /// The token endpoint rejected a grant exchange, or the exchange could
    /// not complete. `status` is 0 for transport or parse failures.
    #[error("token exchange failed (HTTP {status}): {message}")]
    ExchangeFailed { status: u16, message: String },
}

impl Error {
    /// The HTTP status associated with this error, or 0 when none applies.
    pub fn status(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            Self::Auth(e) => e.status(),
            Self::Network(e) => e.status().map(|s| s.as_u16()).unwrap_or(0),
            Self::Config(_) => 0,
        }
    }
}

impl AuthError {
    /// The HTTP status the provider answered with, or 0 when none applies.
    pub fn status(&self) -> u16 {
        match self {
            Self::ExchangeFailed { status, .. } => *status,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_carries_status() {
        let err = Error::Api {
            status: 404,
            message: "not found".into(),
        };
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_auth_error_status_defaults_to_zero() {
        assert_eq!(Error::from(AuthError::NotAuthenticated).status(), 0);
        assert_eq!(Error::from(AuthError::MissingRefreshToken).status(), 0);
    }

    #[test]
    fn test_exchange_failure_propagates_provider_status() {
        let err = Error::from(AuthError::ExchangeFailed {
            status: 400,
            message: "invalid grant".into(),
        });
        assert_eq!(err.status(), 400);
        assert!(err.to_string().contains("invalid grant"));
    }
}
