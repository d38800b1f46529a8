//! Data models: tokens, the response envelope, and domain types.

pub mod account;
pub mod envelope;
pub mod token;
