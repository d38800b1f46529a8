//! Passive rate-limit bookkeeping from response headers.

use reqwest::header::HeaderMap;

/// Credit counters the API reports on every response.
///
/// Counters are `None` until a response carrying the matching header has
/// been observed; an absent header leaves the previous value in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub user_limit: Option<i64>,
    pub user_remaining: Option<i64>,
    /// Unix timestamp at which the user credit pool resets.
    pub user_reset: Option<i64>,
    pub client_limit: Option<i64>,
    pub client_remaining: Option<i64>,
    pub post_limit: Option<i64>,
    pub post_remaining: Option<i64>,
    /// Seconds until the POST credit pool resets.
    pub post_reset: Option<i64>,
}

impl RateLimit {
    /// Merge counters from a response's headers.
    pub fn update_from(&mut self, headers: &HeaderMap) {
        merge(&mut self.user_limit, headers, "x-ratelimit-userlimit");
        merge(&mut self.user_remaining, headers, "x-ratelimit-userremaining");
        merge(&mut self.user_reset, headers, "x-ratelimit-userreset");
        merge(&mut self.client_limit, headers, "x-ratelimit-clientlimit");
        merge(
            &mut self.client_remaining,
            headers,
            "x-ratelimit-clientremaining",
        );
        merge(&mut self.post_limit, headers, "x-post-rate-limit-limit");
        merge(
            &mut self.post_remaining,
            headers,
            "x-post-rate-limit-remaining",
        );
        merge(&mut self.post_reset, headers, "x-post-rate-limit-reset");
    }
}

fn merge(slot: &mut Option<i64>, headers: &HeaderMap, name: &str) {
    if let Some(value) = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
    {
        *slot = Some(value);
    }
}
