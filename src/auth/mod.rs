//! OAuth2 authentication: grant exchanges and token lifecycle.

mod exchange;
mod manager;

pub use exchange::{OAuthExchanger, TokenExchanger};
pub use manager::AuthManager;
