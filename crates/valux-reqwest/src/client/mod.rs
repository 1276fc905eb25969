//! The HTTP gateway.
//!
//! Every resource call goes through [`ApiClient::request`], which attaches
//! the bearer token, unwraps the response envelope and classifies failures.
//! A `401` triggers one token refresh and one retry of the original request.

mod refresh;
mod response;

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
use valux_core::{Error, Result};
use valux_service::Services;

use crate::auth::AuthService;
use crate::config::ApiConfig;
use crate::error::Error as HttpError;
use crate::token::{FileStorage, TokenStore};

/// Tracing target for gateway operations.
pub const TRACING_TARGET: &str = "valux_reqwest::client";

/// Query string pairs.
pub type Query<'a> = &'a [(&'a str, String)];

struct ApiClientInner {
    http: Client,
    config: ApiConfig,
    base_url: Url,
    tokens: TokenStore,
}

/// HTTP client for the valux server.
///
/// Cheap to clone; clones share the connection pool and the token store.
///
/// # Examples
///
/// ```rust,ignore
/// use valux_reqwest::{ApiClient, ApiConfig, TokenStore};
///
/// let client = ApiClient::new(ApiConfig::default(), TokenStore::in_memory())?;
/// let vaults: serde_json::Value = client.get("/vaults", &[("limit", "10".into())]).await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client over an existing token store.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API URL is invalid or the HTTP
    /// client cannot be created.
    pub fn new(config: ApiConfig, tokens: TokenStore) -> Result<Self> {
        let base_url = config.base_url()?;
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %base_url,
            timeout_ms = timeout.as_millis() as u64,
            "Creating API client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|error| {
                Error::from_source(valux_core::ErrorKind::Configuration, error)
                    .with_message("Failed to create HTTP client")
            })?;

        let inner = ApiClientInner {
            http,
            config,
            base_url,
            tokens,
        };

        tracing::info!(target: TRACING_TARGET, "API client created");
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates a client whose tokens persist to the configured token file.
    pub fn from_config(config: ApiConfig) -> Result<Self> {
        let storage = FileStorage::new(config.effective_token_file());
        let tokens = TokenStore::new(storage)?;
        Self::new(config, tokens)
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Returns `{api_url}/api/`.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Gets the token store.
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Returns true if an access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.inner.tokens.is_authenticated()
    }

    /// Stores a new token pair.
    pub fn set_auth_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        self.inner.tokens.set(access, refresh)
    }

    /// Forgets both tokens.
    pub fn clear_auth_tokens(&self) -> Result<()> {
        self.inner.tokens.clear()
    }

    /// Authentication endpoints on this client.
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.clone())
    }

    /// Builds the resource services on top of this client.
    pub fn into_services(self) -> Services {
        Services::from_provider(self)
    }

    /// Resolves `path` against the base URL, percent-encoding each segment.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::configuration().with_message("API URL cannot be a base")
            })?;
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|segment| !segment.is_empty()));
        }
        Ok(url)
    }

    /// Sends one logical request and decodes the unwrapped payload as `T`.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: Query<'_>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let value = self.request_value(method, path, body, query).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Sends one logical request and returns the unwrapped JSON payload.
    pub async fn request_value(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: Query<'_>,
    ) -> Result<Value> {
        let url = self.endpoint(path)?;
        let started_at = Instant::now();

        tracing::debug!(target: TRACING_TARGET, %method, path, "Sending request");

        let access_token = self.inner.tokens.access_token();
        let mut response = self
            .send(method.clone(), &url, body, query, access_token.as_deref())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!(target: TRACING_TARGET, path, "Access token rejected, refreshing");

            if let Err(error) = self.refresh_access_token().await {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Token refresh failed");
                if let Err(clear_error) = self.inner.tokens.clear() {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %clear_error,
                        "Failed to clear tokens after refresh failure"
                    );
                }
                return Err(Error::authentication()
                    .with_message("Authentication failed. Please login again.")
                    .with_status(StatusCode::UNAUTHORIZED.as_u16())
                    .with_source(error));
            }

            let access_token = self.inner.tokens.access_token();
            response = self
                .send(method.clone(), &url, body, query, access_token.as_deref())
                .await?;
        }

        let status = response.status();
        let result = response::read_body(response)
            .await
            .and_then(|body| response::interpret(status, body));

        let elapsed_ms = started_at.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::debug!(
                target: TRACING_TARGET,
                %method,
                path,
                status = status.as_u16(),
                elapsed_ms,
                "Request completed"
            ),
            Err(error) => tracing::debug!(
                target: TRACING_TARGET,
                %method,
                path,
                status = status.as_u16(),
                elapsed_ms,
                error = %error,
                "Request failed"
            ),
        }

        result
    }

    /// `GET path?query`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> Result<T> {
        self.request(Method::GET, path, None, query).await
    }

    /// `POST path` with an optional JSON body.
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::POST, path, body.as_ref(), &[]).await
    }

    /// `PUT path` with an optional JSON body.
    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::PUT, path, body.as_ref(), &[]).await
    }

    /// `PATCH path` with an optional JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::PATCH, path, body.as_ref(), &[]).await
    }

    /// `DELETE path`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, None, &[]).await
    }

    /// Builds a request without sending it.
    ///
    /// The bearer header is only attached when `access_token` is given.
    pub(crate) fn build_request(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
        query: Query<'_>,
        access_token: Option<&str>,
    ) -> Result<RequestBuilder> {
        let mut request = self
            .inner
            .http
            .request(method, url.clone())
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body).map_err(HttpError::from)?);
        }

        Ok(request)
    }

    /// Sends a single request with no refresh handling.
    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
        query: Query<'_>,
        access_token: Option<&str>,
    ) -> Result<Response> {
        let request = self.build_request(method, url, body, query, access_token)?;
        let response = request.send().await.map_err(HttpError::from)?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;
    use valux_core::ErrorKind;

    use super::*;

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ApiConfig::new(server.base_url()), TokenStore::in_memory()).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client =
            ApiClient::new(ApiConfig::new("http://localhost:8080"), TokenStore::in_memory())
                .unwrap();

        let url = client.endpoint("/vaults/address/0xabc").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/vaults/address/0xabc");

        let url = client.endpoint("rules/a b?c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/rules/a%20b%3Fc");
    }

    #[test]
    fn test_bearer_header_only_with_token() {
        let client = ApiClient::new(ApiConfig::default(), TokenStore::in_memory()).unwrap();
        let url = client.endpoint("vaults").unwrap();

        let anonymous = client
            .build_request(Method::GET, &url, None, &[], None)
            .unwrap()
            .build()
            .unwrap();
        assert!(anonymous.headers().get("authorization").is_none());
        assert_eq!(
            anonymous.headers().get("content-type").unwrap(),
            "application/json"
        );

        let authenticated = client
            .build_request(Method::GET, &url, None, &[], Some("abc"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            authenticated.headers().get("authorization").unwrap(),
            "Bearer abc"
        );
    }

    #[tokio::test]
    async fn test_get_unwraps_envelope_and_sends_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/vaults")
                    .query_param("limit", "10")
                    .header("content-type", "application/json");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"success": true, "data": {"vaults": []}, "timestamp": "t"}));
            })
            .await;

        let client = client_for(&server);
        let value: Value = client.get("/vaults", &[("limit", "10".into())]).await.unwrap();

        assert_eq!(value, json!({"vaults": []}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_raw_and_empty_bodies() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/raw");
                then.status(200).json_body(json!([1, 2]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/rules/1");
                then.status(204);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/text");
                then.status(200).body("pong");
            })
            .await;

        let client = client_for(&server);
        assert_eq!(client.get::<Value>("raw", &[]).await.unwrap(), json!([1, 2]));
        assert_eq!(client.delete::<Value>("rules/1").await.unwrap(), Value::Null);
        assert_eq!(client.get::<Value>("text", &[]).await.unwrap(), json!("pong"));
    }

    #[tokio::test]
    async fn test_envelope_failure_on_2xx() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/rules");
                then.status(200)
                    .json_body(json!({"success": false, "error": "Invalid rule", "timestamp": "t"}));
            })
            .await;

        let client = client_for(&server);
        let error = client
            .post::<Value, _>("rules", Some(&json!({"name": "x"})))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Api);
        assert_eq!(error.message(), "Invalid rule");
        assert!(error.details.is_some());
    }

    #[tokio::test]
    async fn test_decode_failure_is_serialization() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/count");
                then.status(200).json_body(json!({"success": true, "data": "seven"}));
            })
            .await;

        let error = client_for(&server).get::<u32>("count", &[]).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }

    #[tokio::test]
    async fn test_401_refreshes_and_retries_once() {
        let server = MockServer::start_async().await;
        let rejected = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/portfolio/user/0x1")
                    .header("authorization", "Bearer old-access");
                then.status(401).json_body(json!({"message": "Token expired"}));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/auth/refresh")
                    .json_body(json!({"refresh_token": "refresh-1"}));
                then.status(200)
                    .json_body(json!({"access_token": "new-access", "expires_in": 900}));
            })
            .await;
        let accepted = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/portfolio/user/0x1")
                    .header("authorization", "Bearer new-access");
                then.status(200).json_body(json!({"success": true, "data": {"ok": true}}));
            })
            .await;

        let client = client_for(&server);
        client.set_auth_tokens("old-access", "refresh-1").unwrap();

        let value: Value = client.get("portfolio/user/0x1", &[]).await.unwrap();
        assert_eq!(value, json!({"ok": true}));

        assert_eq!(rejected.hits_async().await, 1);
        assert_eq!(refresh.hits_async().await, 1);
        assert_eq!(accepted.hits_async().await, 1);
        assert_eq!(client.tokens().access_token().as_deref(), Some("new-access"));
        assert_eq!(client.tokens().refresh_token().as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn test_refresh_accepts_enveloped_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/me").header("authorization", "Bearer a");
                then.status(401);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/refresh");
                then.status(200).json_body(json!({
                    "success": true,
                    "data": {"access_token": "b"},
                    "timestamp": "t"
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/me").header("authorization", "Bearer b");
                then.status(200).json_body(json!({"id": "u1"}));
            })
            .await;

        let client = client_for(&server);
        client.set_auth_tokens("a", "r").unwrap();

        let value: Value = client.get("me", &[]).await.unwrap();
        assert_eq!(value, json!({"id": "u1"}));
    }

    #[tokio::test]
    async fn test_second_401_is_final() {
        let server = MockServer::start_async().await;
        let protected = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/rules/user/0x1");
                then.status(401).json_body(json!({"message": "Still unauthorized"}));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/refresh");
                then.status(200).json_body(json!({"access_token": "new-access"}));
            })
            .await;

        let client = client_for(&server);
        client.set_auth_tokens("old-access", "refresh-1").unwrap();

        let error = client.get::<Value>("rules/user/0x1", &[]).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Api);
        assert!(error.has_status(401));
        assert_eq!(error.message(), "Still unauthorized");

        assert_eq!(protected.hits_async().await, 2);
        assert_eq!(refresh.hits_async().await, 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_tokens() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/vaults");
                then.status(401);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/refresh");
                then.status(401).json_body(json!({"message": "Refresh token revoked"}));
            })
            .await;

        let client = client_for(&server);
        client.set_auth_tokens("old-access", "refresh-1").unwrap();

        let error = client.get::<Value>("vaults", &[]).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authentication);
        assert_eq!(error.message(), "Authentication failed. Please login again.");
        assert!(!client.is_authenticated());
        assert!(client.tokens().refresh_token().is_none());
    }

    #[tokio::test]
    async fn test_401_without_refresh_token_skips_refresh() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/analytics/user/0x1");
                then.status(401);
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/refresh");
                then.status(200).json_body(json!({"access_token": "never"}));
            })
            .await;

        let client = client_for(&server);
        let error = client
            .get::<Value>("analytics/user/0x1", &[])
            .await
            .unwrap_err();

        assert!(error.is_auth_error());
        assert_eq!(refresh.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/slow");
                then.status(200)
                    .delay(Duration::from_millis(2500))
                    .json_body(json!({}));
            })
            .await;

        let config = ApiConfig::new(server.base_url()).with_timeout(1);
        let client = ApiClient::new(config, TokenStore::in_memory()).unwrap();

        let error = client.get::<Value>("slow", &[]).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Network);
        assert_eq!(error.message(), "Request timeout");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let config = ApiConfig::new("http://127.0.0.1:1").with_timeout(5);
        let client = ApiClient::new(config, TokenStore::in_memory()).unwrap();

        let error = client.get::<Value>("vaults", &[]).await.unwrap_err();
        assert!(error.is_network_error());
        assert_eq!(error.message(), "Network error occurred");
        assert!(error.source.is_some());
    }

    #[tokio::test]
    async fn test_timeout_leaves_tokens_untouched() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/portfolio/user/0x1");
                then.status(200)
                    .delay(Duration::from_millis(2500))
                    .json_body(json!({}));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/refresh");
                then.status(200).json_body(json!({"access_token": "never"}));
            })
            .await;

        let config = ApiConfig::new(server.base_url()).with_timeout(1);
        let client = ApiClient::new(config, TokenStore::in_memory()).unwrap();
        client.set_auth_tokens("access-1", "refresh-1").unwrap();

        let error = client
            .get::<Value>("portfolio/user/0x1", &[])
            .await
            .unwrap_err();
        assert!(error.is_network_error());
        assert_eq!(client.tokens().access_token().as_deref(), Some("access-1"));
        assert_eq!(client.tokens().refresh_token().as_deref(), Some("refresh-1"));
        assert_eq!(refresh.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_login_then_protected_request_uses_new_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/login");
                then.status(201).json_body(json!({
                    "success": true,
                    "data": {
                        "access_token": "A",
                        "refresh_token": "R",
                        "expires_in": 900,
                        "user": {"id": "u1", "address": "0xabc", "createdAt": "t", "updatedAt": "t"}
                    }
                }));
            })
            .await;
        let protected = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/portfolio/user/0xabc")
                    .header("authorization", "Bearer A");
                then.status(200)
                    .json_body(json!({"success": true, "data": {"totalValue": 10}}));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/refresh");
                then.status(200).json_body(json!({"access_token": "never"}));
            })
            .await;

        let client = client_for(&server);
        let request = crate::LoginRequest {
            address: "0xabc".into(),
            signature: "0xsig".into(),
            message: "Sign in".into(),
        };
        client.auth().login(&request).await.unwrap();

        let body = client
            .get::<Value>("portfolio/user/0xabc", &[])
            .await
            .unwrap();
        assert_eq!(body, json!({"totalValue": 10}));
        protected.assert_async().await;
        assert_eq!(refresh.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_calls_with_failed_refresh_all_fail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/vaults");
                then.status(401);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/rules/user/0x1");
                then.status(401);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/refresh");
                then.status(401).json_body(json!({"message": "Refresh token revoked"}));
            })
            .await;

        let client = client_for(&server);
        client.set_auth_tokens("old-access", "refresh-1").unwrap();

        let (vaults, rules) = tokio::join!(
            client.get::<Value>("vaults", &[]),
            client.get::<Value>("rules/user/0x1", &[]),
        );

        assert_eq!(vaults.unwrap_err().kind(), ErrorKind::Authentication);
        assert_eq!(rules.unwrap_err().kind(), ErrorKind::Authentication);
        assert!(client.tokens().access_token().is_none());
        assert!(client.tokens().refresh_token().is_none());
    }

    #[tokio::test]
    async fn test_refresh_timeout_clears_tokens() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/vaults");
                then.status(401);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/refresh");
                then.status(200)
                    .delay(Duration::from_millis(2500))
                    .json_body(json!({"access_token": "too-late"}));
            })
            .await;

        let config = ApiConfig::new(server.base_url()).with_timeout(1);
        let client = ApiClient::new(config, TokenStore::in_memory()).unwrap();
        client.set_auth_tokens("old-access", "refresh-1").unwrap();

        let error = client.get::<Value>("vaults", &[]).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authentication);
        assert_eq!(error.message(), "Authentication failed. Please login again.");
        assert!(!client.is_authenticated());
        assert!(client.tokens().refresh_token().is_none());
    }
}
