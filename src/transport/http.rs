//! HTTP request pipeline for the Imgur API.
//!
//! Every call goes through the same sequence: stamp the `Authorization`
//! header via the auth manager, send, fold the rate-limit headers into the
//! passive counters, then run envelope validation on the body. No retries —
//! a failed call is reported to the caller, who owns retry policy.

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::AuthManager;
use crate::config::{self, CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::error::{Error, Result};
use crate::models::envelope::{self, Envelope};
use crate::transport::quota::RateLimit;

/// HTTP client for the Imgur API.
pub struct ImgurHttpClient {
    client: reqwest::Client,
    auth: std::sync::Arc<AuthManager>,
    base_url: String,
    rate_limit: RwLock<RateLimit>,
}

impl ImgurHttpClient {
    /// Create a new HTTP client targeting `base_url`.
    pub fn new(auth: std::sync::Arc<AuthManager>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Network)?;
        Ok(Self::with_client(client, auth, base_url))
    }

    /// Create with a custom reqwest client.
    pub fn with_client(
        client: reqwest::Client,
        auth: std::sync::Arc<AuthManager>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth,
            base_url: base_url.into(),
            rate_limit: RwLock::new(RateLimit::default()),
        }
    }

    /// The base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Last observed rate-limit counters.
    pub async fn rate_limit(&self) -> RateLimit {
        *self.rate_limit.read().await
    }

    /// `GET` a resource and unwrap its envelope.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json(Method::GET, path, None).await
    }

    /// `POST` a JSON body to a resource and unwrap the response envelope.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        self.request_json(Method::POST, path, Some(body)).await
    }

    /// `DELETE` a resource and unwrap the response envelope.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json(Method::DELETE, path, None).await
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let url = config::resource_url(&self.base_url, path);
        let header = self.auth.authorization_header().await;

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(AUTHORIZATION, header);
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, url = url.as_str(), "Sending API request");
        let response = request.send().await.map_err(Error::Network)?;

        let status = response.status().as_u16();
        self.rate_limit
            .write()
            .await
            .update_from(response.headers());

        let text = response.text().await.map_err(Error::Network)?;

        if status != 200 {
            let message = envelope::provider_message(&text)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(Error::Api {
                status,
                message: format!("request to {} failed: {}", url, message),
            });
        }

        let parsed: Envelope<T> = serde_json::from_str(&text).map_err(|e| Error::Api {
            status: 0,
            message: format!("failed to parse response envelope: {}", e),
        })?;
        parsed.into_payload(status, &url)
    }

    /// Probe whether the current access token is still accepted.
    ///
    /// `HEAD /oauth2/secret` answers 200 for a valid bearer token. Advisory
    /// only: any failure, including transport errors, is reported as
    /// `false` rather than propagated. No refresh is attempted; the probe
    /// checks the token as-is.
    pub async fn probe_token(&self) -> bool {
        let Some(access_token) = self.auth.access_token().await else {
            return false;
        };
        let url = config::token_probe_url(&self.base_url);

        match self
            .client
            .head(&url)
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await
        {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                debug!(error = %e, "Token probe failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for ImgurHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgurHttpClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::OAuthExchanger;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN_BODY: &str = r#"{
        "access_token": "AT1",
        "refresh_token": "RT1",
        "expires_in": 3600,
        "token_type": "bearer",
        "account_id": 42,
        "account_username": "alice"
    }"#;

    fn http_client(server: &MockServer) -> ImgurHttpClient {
        let exchanger = Arc::new(OAuthExchanger::new(reqwest::Client::new(), server.uri()));
        let auth = Arc::new(AuthManager::new(exchanger, "cid", "csecret"));
        ImgurHttpClient::with_client(reqwest::Client::new(), auth, server.uri())
    }

    #[tokio::test]
    async fn test_anonymous_request_stamps_client_id_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/credits"))
            .and(header("authorization", "Client-ID cid"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"data": 7, "success": true, "status": 200}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let http = http_client(&server);
        let payload: i64 = http.get_json("3/credits").await.unwrap();
        assert_eq!(payload, 7);
    }

    #[tokio::test]
    async fn test_authenticated_request_stamps_bearer_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(TOKEN_BODY, "application/json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3/credits"))
            .and(header("authorization", "Bearer AT1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"data": 1, "success": true, "status": 200}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let http = http_client(&server);
        http.auth.set_refresh_token("RT0").await.unwrap();
        let payload: i64 = http.get_json("3/credits").await.unwrap();
        assert_eq!(payload, 1);
    }

    #[tokio::test]
    async fn test_post_and_delete_go_through_the_same_pipeline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/3/album"))
            .and(header("authorization", "Client-ID cid"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"data": {"id": "abc"}, "success": true, "status": 200}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/3/album/abc"))
            .and(header("authorization", "Client-ID cid"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"data": true, "success": true, "status": 200}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let http = http_client(&server);
        let created: serde_json::Value = http
            .post_json("3/album", &serde_json::json!({"title": "vacation"}))
            .await
            .unwrap();
        assert_eq!(created["id"], "abc");

        let deleted: bool = http.delete_json("3/album/abc").await.unwrap();
        assert!(deleted);
    }

    #[tokio::test]
    async fn test_non_200_surfaces_provider_message_and_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/secret"))
            .respond_with(ResponseTemplate::new(403).set_body_raw(
                r#"{"data":{"error":"Forbidden resource"},"success":false,"status":403}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let http = http_client(&server);
        let err = http.get_json::<i64>("3/secret").await.unwrap_err();
        assert_eq!(err.status(), 403);
        let message = err.to_string();
        assert!(message.contains("Forbidden resource"));
        assert!(message.contains("/3/secret"));
    }

    #[tokio::test]
    async fn test_missing_payload_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"data": null, "success": true, "status": 200}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let http = http_client(&server);
        let err = http.get_json::<i64>("3/empty").await.unwrap_err();
        assert_eq!(err.status(), 0);
        assert!(err.to_string().contains("no response body found"));
    }

    #[tokio::test]
    async fn test_rate_limit_counters_are_folded_in() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/credits"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"data": 7, "success": true, "status": 200}"#, "application/json")
                    .insert_header("x-ratelimit-userremaining", "499")
                    .insert_header("x-ratelimit-clientremaining", "12400"),
            )
            .mount(&server)
            .await;

        let http = http_client(&server);
        assert_eq!(http.rate_limit().await, RateLimit::default());
        let _: i64 = http.get_json("3/credits").await.unwrap();

        let limit = http.rate_limit().await;
        assert_eq!(limit.user_remaining, Some(499));
        assert_eq!(limit.client_remaining, Some(12400));
    }

    #[tokio::test]
    async fn test_probe_token_is_advisory() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(TOKEN_BODY, "application/json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/oauth2/secret"))
            .and(header("authorization", "Bearer AT1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let http = http_client(&server);
        // Anonymous: no token to probe, no network call needed.
        assert!(!http.probe_token().await);

        http.auth.set_refresh_token("RT0").await.unwrap();
        assert!(http.probe_token().await);
    }

    #[tokio::test]
    async fn test_probe_token_false_on_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(TOKEN_BODY, "application/json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/oauth2/secret"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let http = http_client(&server);
        http.auth.set_refresh_token("RT0").await.unwrap();
        assert!(!http.probe_token().await);
    }
}
