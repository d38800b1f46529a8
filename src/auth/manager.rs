//! Token lifecycle manager.
//!
//! Owns the current [`Token`] (if any), decides when to refresh, and builds
//! the `Authorization` header for outgoing requests.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::auth::exchange::TokenExchanger;
use crate::config::DEFAULT_REFRESH_THRESHOLD_SECS;
use crate::error::{AuthError, Result};
use crate::models::account::Account;
use crate::models::token::Token;

/// Mutable authentication state. Token and cached profile live under one
/// lock so a token swap and the cache invalidation are atomic with respect
/// to readers.
#[derive(Debug, Default)]
struct AuthState {
    token: Option<Token>,
    account: Option<Account>,
}

/// Manages the OAuth2 token lifecycle.
///
/// Two states: anonymous (no token) and authenticated. All transitions are
/// atomic: a failed exchange leaves the previous state untouched.
///
/// Thread-safe: uses `RwLock` internally so it can be shared across tasks.
/// A refresh holds the write lock for its whole duration and re-checks
/// freshness after acquiring it, so concurrent callers converge on a single
/// in-flight refresh.
pub struct AuthManager {
    state: RwLock<AuthState>,
    exchanger: Arc<dyn TokenExchanger>,
    client_id: String,
    client_secret: String,
    /// Seconds before expiry at which a proactive refresh is triggered.
    refresh_threshold_secs: i64,
}

impl AuthManager {
    /// Create an anonymous manager for an application credential pair.
    pub fn new(
        exchanger: Arc<dyn TokenExchanger>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            state: RwLock::new(AuthState::default()),
            exchanger,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_threshold_secs: DEFAULT_REFRESH_THRESHOLD_SECS,
        }
    }

    /// Override the proactive refresh threshold.
    pub fn with_refresh_threshold(mut self, seconds: i64) -> Self {
        self.refresh_threshold_secs = seconds;
        self
    }

    /// The application client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Exchange a one-time authorization code and install the resulting
    /// token, discarding any previous token and cached profile.
    ///
    /// Returns the refresh token so callers can persist it. On failure the
    /// previous state is untouched.
    pub async fn set_authorization_code(&self, code: &str) -> Result<String> {
        let token = self
            .exchanger
            .exchange_authorization_code(&self.client_id, &self.client_secret, code)
            .await?;
        let refresh_token = token.refresh_token.clone();
        info!(account = token.account_username.as_str(), "Authenticated via authorization code");
        self.install(token).await;
        Ok(refresh_token)
    }

    /// Validate a refresh token by exchanging it immediately, and install
    /// the resulting token. On failure the previous state is untouched.
    pub async fn set_refresh_token(&self, refresh_token: &str) -> Result<()> {
        let token = self
            .exchanger
            .exchange_refresh_token(&self.client_id, &self.client_secret, refresh_token)
            .await?;
        info!(account = token.account_username.as_str(), "Authenticated via refresh token");
        self.install(token).await;
        Ok(())
    }

    /// Drop the current token and cached profile, returning to anonymous.
    pub async fn log_out(&self) {
        let mut state = self.state.write().await;
        state.token = None;
        state.account = None;
        info!("Logged out");
    }

    /// Whether a token is installed, regardless of its freshness.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.token.is_some()
    }

    /// Username of the authenticated account, if any.
    pub async fn authenticated_user_name(&self) -> Option<String> {
        self.state
            .read()
            .await
            .token
            .as_ref()
            .map(|t| t.account_username.clone())
    }

    /// Read-only snapshot of the current token.
    pub async fn current_token(&self) -> Option<Token> {
        self.state.read().await.token.clone()
    }

    /// The current access token, if authenticated.
    pub async fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .token
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    /// Build the `Authorization` header value for an outgoing request.
    ///
    /// Authenticated: `Bearer <access_token>`, after attempting a proactive
    /// refresh. A refresh failure is logged and the current (possibly stale)
    /// token is stamped anyway — the server is the final arbiter of token
    /// validity. Anonymous: `Client-ID <client_id>`; never fails.
    pub async fn authorization_header(&self) -> String {
        if self.is_authenticated().await {
            if let Err(e) = self.ensure_fresh().await {
                warn!(error = %e, "Proactive refresh failed; sending current token");
            }
            if let Some(token) = self.state.read().await.token.as_ref() {
                return format!("Bearer {}", token.access_token);
            }
        }
        format!("Client-ID {}", self.client_id)
    }

    /// Refresh the token if it is expiring soon.
    ///
    /// Fails with [`AuthError::NotAuthenticated`] while anonymous, without
    /// touching the network. A failed refresh leaves the stale token in
    /// place; the next call retries.
    pub async fn ensure_fresh(&self) -> Result<()> {
        {
            let state = self.state.read().await;
            match state.token.as_ref() {
                None => return Err(AuthError::NotAuthenticated.into()),
                Some(token)
                    if !token.is_expiring_soon(Utc::now(), self.refresh_threshold_secs) =>
                {
                    return Ok(());
                }
                Some(_) => {}
            }
        }
        self.refresh().await
    }

    async fn refresh(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let token = state.token.as_ref().ok_or(AuthError::NotAuthenticated)?;

        // Double-check: another task may have refreshed while we waited for
        // the write lock.
        if !token.is_expiring_soon(Utc::now(), self.refresh_threshold_secs) {
            return Ok(());
        }

        if token.refresh_token.is_empty() {
            return Err(AuthError::MissingRefreshToken.into());
        }

        debug!("Refreshing access token");
        let new_token = self
            .exchanger
            .exchange_refresh_token(&self.client_id, &self.client_secret, &token.refresh_token)
            .await?;

        info!("Token refreshed");
        state.token = Some(new_token);
        state.account = None;
        Ok(())
    }

    /// Cached authenticated profile, if one was fetched for the current
    /// token. Never refreshed automatically; invalidated on token swap.
    pub async fn cached_account(&self) -> Option<Account> {
        self.state.read().await.account.clone()
    }

    pub(crate) async fn cache_account(&self, account: Account) {
        self.state.write().await.account = Some(account);
    }

    async fn install(&self, token: Token) {
        let mut state = self.state.write().await;
        state.token = Some(token);
        state.account = None;
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("client_id", &self.client_id)
            .field("refresh_threshold_secs", &self.refresh_threshold_secs)
            .finish()
    }
}
