//! Main client entry point.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::auth::{AuthManager, OAuthExchanger};
use crate::config::{self, CONNECT_TIMEOUT, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
use crate::error::{AuthError, Error, Result};
use crate::models::account::Account;
use crate::transport::{ImgurHttpClient, RateLimit};

/// Imgur API client.
///
/// Anonymous out of the box (requests carry `Client-ID`); authenticate with
/// [`set_authorization_code`](Self::set_authorization_code) or
/// [`set_refresh_token`](Self::set_refresh_token) to act as a user.
///
/// # Examples
///
/// ```rust,no_run
/// use imgur_client::{ImgurClient, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let client = ImgurClient::builder()
///         .client_id("YOUR_CLIENT_ID")
///         .client_secret("YOUR_CLIENT_SECRET")
///         .build()
///         .await?;
///
///     let refresh_token = client.set_authorization_code("code-from-redirect").await?;
///     println!("persist this: {}", refresh_token);
///
///     let account = client.authenticated_account().await?;
///     println!("logged in as {}", account.username);
///     Ok(())
/// }
/// ```
pub struct ImgurClient {
    auth: Arc<AuthManager>,
    http: Arc<ImgurHttpClient>,
}

impl ImgurClient {
    /// Create a builder for configuring the client.
    pub fn builder() -> ImgurClientBuilder {
        ImgurClientBuilder::new()
    }

    /// The browser URL a user must visit to grant this application access.
    /// The redirect carries the authorization code to pass to
    /// [`set_authorization_code`](Self::set_authorization_code).
    pub fn authorize_url(&self, state: Option<&str>) -> String {
        config::authorize_url(self.http.base_url(), self.auth.client_id(), state)
    }

    /// Exchange a one-time authorization code and switch to authenticated
    /// mode. Returns the long-lived refresh token for persistence.
    pub async fn set_authorization_code(&self, code: &str) -> Result<String> {
        self.auth.set_authorization_code(code).await
    }

    /// Authenticate with a previously persisted refresh token. The token is
    /// validated immediately by exchanging it for an access token.
    pub async fn set_refresh_token(&self, refresh_token: &str) -> Result<()> {
        self.auth.set_refresh_token(refresh_token).await
    }

    /// Drop the current credentials and return to anonymous mode.
    pub async fn log_out(&self) {
        self.auth.log_out().await;
    }

    /// Whether a token is installed, regardless of its freshness.
    pub async fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated().await
    }

    /// Username of the authenticated account, if any.
    pub async fn authenticated_user_name(&self) -> Option<String> {
        self.auth.authenticated_user_name().await
    }

    /// Probe whether the current access token is still accepted by the API.
    /// Advisory: transport failures answer `false` rather than erroring.
    pub async fn is_access_token_valid(&self) -> bool {
        self.http.probe_token().await
    }

    /// The `Authorization` header value the client would stamp on an
    /// outgoing request right now (refreshing the token first if needed).
    pub async fn authorization_header(&self) -> String {
        self.auth.authorization_header().await
    }

    /// Profile of the authenticated account.
    ///
    /// Fails fast with an auth error while anonymous, without touching the
    /// network. The profile is cached for the lifetime of the current
    /// token; call [`account`](Self::account) for a fresh fetch.
    pub async fn authenticated_account(&self) -> Result<Account> {
        let username = self
            .auth
            .authenticated_user_name()
            .await
            .ok_or(AuthError::NotAuthenticated)?;

        if let Some(account) = self.auth.cached_account().await {
            return Ok(account);
        }

        let account = self.account(&username).await?;
        self.auth.cache_account(account.clone()).await;
        Ok(account)
    }

    /// Fetch any account's public profile.
    pub async fn account(&self, username: &str) -> Result<Account> {
        self.http
            .get_json(&format!("3/account/{}", urlencoding::encode(username)))
            .await
    }

    /// Fetch an arbitrary resource path through the authenticated pipeline
    /// (escape hatch for endpoints without a typed wrapper).
    pub async fn get_resource<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.http.get_json(path).await
    }

    /// Last observed rate-limit counters.
    pub async fn rate_limit(&self) -> RateLimit {
        self.http.rate_limit().await
    }

    /// Get a reference to the auth manager.
    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }
}

impl std::fmt::Debug for ImgurClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgurClient")
            .field("http", &self.http)
            .finish()
    }
}

/// Builder for [`ImgurClient`].
pub struct ImgurClientBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    base_url: String,
    refresh_token: Option<String>,
    refresh_threshold_secs: Option<i64>,
    reqwest_client: Option<reqwest::Client>,
}

impl ImgurClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_token: None,
            refresh_threshold_secs: None,
            reqwest_client: None,
        }
    }

    /// Set the application client id (required).
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the application client secret (required).
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Override the API base URL. Per-instance; useful for test servers.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Authenticate with this refresh token during `build`.
    pub fn refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Override the proactive refresh threshold (seconds before expiry).
    pub fn refresh_threshold_secs(mut self, seconds: i64) -> Self {
        self.refresh_threshold_secs = Some(seconds);
        self
    }

    /// Set a custom reqwest client (custom TLS, proxies, timeouts).
    pub fn reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.reqwest_client = Some(client);
        self
    }

    /// Build the client, authenticating if a refresh token was supplied.
    pub async fn build(self) -> Result<ImgurClient> {
        let client_id = self
            .client_id
            .ok_or_else(|| Error::Config("client_id is required".into()))?;
        let client_secret = self
            .client_secret
            .ok_or_else(|| Error::Config("client_secret is required".into()))?;

        let http_client = match self.reqwest_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(Error::Network)?,
        };

        let exchanger = Arc::new(OAuthExchanger::new(
            http_client.clone(),
            self.base_url.clone(),
        ));
        let mut auth = AuthManager::new(exchanger, client_id, client_secret);
        if let Some(seconds) = self.refresh_threshold_secs {
            auth = auth.with_refresh_threshold(seconds);
        }
        let auth = Arc::new(auth);

        let http = Arc::new(ImgurHttpClient::with_client(
            http_client,
            Arc::clone(&auth),
            self.base_url,
        ));

        let client = ImgurClient { auth, http };
        if let Some(refresh_token) = self.refresh_token {
            client.set_refresh_token(&refresh_token).await?;
        }

        info!("ImgurClient initialized");
        Ok(client)
    }
}

impl Default for ImgurClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
