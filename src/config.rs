//! Configuration constants and URL builders for the Imgur API.

use std::time::Duration;

/// Default API base URL. Each client instance owns its base URL; pass a
/// different one to the builder to target a test server.
pub const DEFAULT_BASE_URL: &str = "https://api.imgur.com";

/// Seconds before expiry at which a token counts as expiring and a
/// proactive refresh is triggered. Large enough that the refresh completes
/// before true expiry under normal network latency.
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 60;

/// Connect timeout for HTTP requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Total timeout for HTTP requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn join(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Returns the OAuth2 token endpoint URL.
pub fn token_url(base_url: &str) -> String {
    join(base_url, "oauth2/token")
}

/// Returns the token validity probe URL (`HEAD` returns 200 iff the
/// attached bearer token is valid).
pub fn token_probe_url(base_url: &str) -> String {
    join(base_url, "oauth2/secret")
}

/// Returns the browser authorization URL a user must visit to grant access.
///
/// The resulting redirect carries the authorization code to exchange via
/// [`crate::auth::TokenExchanger::exchange_authorization_code`].
pub fn authorize_url(base_url: &str, client_id: &str, state: Option<&str>) -> String {
    let mut url = format!(
        "{}?client_id={}&response_type=code",
        join(base_url, "oauth2/authorize"),
        urlencoding::encode(client_id),
    );
    if let Some(state) = state {
        url.push_str("&state=");
        url.push_str(&urlencoding::encode(state));
    }
    url
}

/// Returns the absolute URL for an arbitrary resource path.
pub fn resource_url(base_url: &str, path: &str) -> String {
    join(base_url, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url_trims_trailing_slash() {
        assert_eq!(
            token_url("https://api.imgur.com/"),
            "https://api.imgur.com/oauth2/token"
        );
        assert_eq!(
            token_url("https://api.imgur.com"),
            "https://api.imgur.com/oauth2/token"
        );
    }

    #[test]
    fn test_authorize_url_encodes_parameters() {
        let url = authorize_url(DEFAULT_BASE_URL, "abc 123", Some("st/ate"));
        assert!(url.starts_with("https://api.imgur.com/oauth2/authorize?client_id="));
        assert!(url.contains("client_id=abc%20123"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=st%2Fate"));
    }

    #[test]
    fn test_authorize_url_without_state() {
        let url = authorize_url(DEFAULT_BASE_URL, "abc", None);
        assert!(!url.contains("state="));
    }

    #[test]
    fn test_resource_url_normalizes_leading_slash() {
        assert_eq!(
            resource_url(DEFAULT_BASE_URL, "/3/image/xyz"),
            "https://api.imgur.com/3/image/xyz"
        );
    }
}
