//! # imgur-client
//!
//! Rust client library for the Imgur REST API.
//!
//! Centered on the OAuth2 token lifecycle: authorization-code and
//! refresh-token exchange, proactive access-token renewal, and per-request
//! `Authorization` header construction. Every API response goes through
//! uniform envelope validation, and rate-limit headers are folded into
//! passive counters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imgur_client::{ImgurClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ImgurClient::builder()
//!         .client_id("YOUR_CLIENT_ID")
//!         .client_secret("YOUR_CLIENT_SECRET")
//!         .build()
//!         .await?;
//!
//!     // Anonymous requests carry `Authorization: Client-ID ...`
//!     let account = client.account("ghostinspector").await?;
//!     println!("{} has {} reputation", account.username, account.reputation);
//!
//!     // Authenticate with a persisted refresh token
//!     client.set_refresh_token("YOUR_REFRESH_TOKEN").await?;
//!     let me = client.authenticated_account().await?;
//!     println!("logged in as {}", me.username);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;

// Re-exports for ergonomic usage
pub use auth::{AuthManager, OAuthExchanger, TokenExchanger};
pub use client::{ImgurClient, ImgurClientBuilder};
pub use error::{AuthError, Error, Result};
pub use models::account::Account;
pub use models::envelope::Envelope;
pub use models::token::{Token, TokenType};
pub use transport::{ImgurHttpClient, RateLimit};
