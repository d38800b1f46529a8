//! HTTP pipeline and passive quota bookkeeping.

mod http;
mod quota;

pub use http::ImgurHttpClient;
pub use quota::RateLimit;
