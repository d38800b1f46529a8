//! The generic response envelope and its validation protocol.
//!
//! Every `/3/` endpoint wraps its payload as `{ data, success, status }`.
//! [`Envelope::into_payload`] enforces the envelope invariants uniformly for
//! every API call.

use serde::Deserialize;

use crate::error::{Error, Result};

/// A deserialized response envelope, payload still wrapped.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// The payload, absent when the API returned nothing usable.
    pub data: Option<T>,
    /// Application-level success flag from the JSON body.
    #[serde(default)]
    pub success: bool,
    /// Application-level status code from the JSON body.
    #[serde(default)]
    pub status: i32,
}

impl<T> Envelope<T> {
    /// Validate the envelope invariants and unwrap the payload.
    ///
    /// Checks run in order:
    /// 1. HTTP status must be 200 — diagnosed first because a non-200 body
    ///    may not even parse as the expected payload shape;
    /// 2. the payload must be present;
    /// 3. the application status must be 200 and the success flag true.
    pub fn into_payload(self, http_status: u16, url: &str) -> Result<T> {
        if http_status != 200 {
            return Err(Error::Api {
                status: http_status,
                message: format!("request to {} failed", url),
            });
        }
        let Some(data) = self.data else {
            return Err(Error::Api {
                status: 0,
                message: "no response body found".into(),
            });
        };
        if self.status != 200 || !self.success {
            return Err(Error::Api {
                status: u16::try_from(self.status).unwrap_or(0),
                message: format!("unknown error (status {})", self.status),
            });
        }
        Ok(data)
    }
}

/// Error payload shape the API uses for failed requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Best-effort extraction of the provider's error message from a failed
/// response body. Returns `None` when the body is not the error envelope.
pub(crate) fn provider_message(body: &str) -> Option<String> {
    let envelope: Envelope<ErrorBody> = serde_json::from_str(body).ok()?;
    envelope.data.and_then(|d| d.error)
}
