use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::common::ApiQueryParams;
use super::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const TENANT_ID_HEADER: &str = "x-tenant-id";
pub const DEFAULT_API_URL: &str = "https://api.smith.langchain.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const JSON: &str = "application/json";

/// Connection settings for the LangSmith API
#[derive(Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_key: String,
    pub tenant_id: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            tenant_id: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_tenant_id(mut self, tenant_id: Option<String>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// The API key stays out of Debug output
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("tenant_id", &self.tenant_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// LangSmith API client
///
/// Cheap to clone; every clone shares one connection pool and one immutable
/// configuration.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    tenant_id: Option<String>,
    timeout: Duration,
}

impl Client {
    /// Create a new API client for the default API URL
    pub fn new(api_key: &str) -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(&config.api_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.api_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                config.api_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ApiError::InvalidConfig("API key contains invalid characters".to_string()))?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);

        if let Some(tenant_id) = &config.tenant_id {
            let value = HeaderValue::from_str(tenant_id).map_err(|_| {
                ApiError::InvalidConfig("tenant ID contains invalid characters".to_string())
            })?;
            headers.insert(TENANT_ID_HEADER, value);
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: config.api_url.trim_end_matches('/').to_string(),
                tenant_id: config.tenant_id,
                timeout: config.timeout,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.inner.tenant_id.as_deref()
    }

    /// Execute a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<T, ApiError> {
        self.send(Method::GET, path, Some(params), None::<&()>).await
    }

    /// Execute a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, None, Some(body)).await
    }

    /// Execute a POST request with query parameters and a JSON body
    pub async fn post_with_query<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        params: &ApiQueryParams,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, Some(params), Some(body)).await
    }

    /// Execute a PATCH request with a JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::PATCH, path, None, Some(body)).await
    }

    /// Execute a PUT request with a JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::PUT, path, None, Some(body)).await
    }

    /// Execute a DELETE request, ignoring any response body
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<serde::de::IgnoredAny, ()>(Method::DELETE, path, None, None)
            .await
            .map(|_| ())
    }

    pub async fn delete_with_query(&self, path: &str, params: &ApiQueryParams) -> Result<(), ApiError> {
        self.send::<serde::de::IgnoredAny, ()>(Method::DELETE, path, Some(params), None)
            .await
            .map(|_| ())
    }

    pub async fn delete_with_body<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.send::<serde::de::IgnoredAny, B>(Method::DELETE, path, None, Some(body))
            .await
            .map(|_| ())
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        params: Option<&ApiQueryParams>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let query = params.map(ApiQueryParams::to_query_string).unwrap_or_default();
        let url = format!("{}{}{}", self.inner.base_url, path, query);

        tracing::debug!(%method, %url, "LangSmith API request");

        let mut request = self.inner.http_client.request(method.clone(), &url);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| ApiError::Encode(e.to_string()))?;
            request = request.header(CONTENT_TYPE, JSON).body(bytes);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "LangSmith API returned an error");
            return Err(ApiError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "LangSmith API response");
        decode_body(&bytes)
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.inner.timeout.as_secs())
        } else {
            ApiError::Request(error)
        }
    }
}

/// Decodes a success body. An empty body decodes as JSON null, which
/// satisfies `()`, `Option<T>` and `IgnoredAny` but not concrete objects.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };

    serde_json::from_slice(payload).map_err(|e| {
        tracing::error!("Failed to deserialize response: {}", e);
        ApiError::Parse(format!("Failed to parse response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: String,
        name: String,
    }

    fn client_for(server: &mockito::ServerGuard) -> Client {
        Client::with_config(ClientConfig::new("ls-test-key").with_api_url(server.url())).unwrap()
    }

    #[tokio::test]
    async fn client_attaches_auth_and_accept_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/things/1")
            .match_header("x-api-key", "ls-test-key")
            .match_header("accept", "application/json")
            .match_header("x-tenant-id", Matcher::Missing)
            .with_body(r#"{"id":"1","name":"one"}"#)
            .create_async()
            .await;

        let thing: Thing = client_for(&server)
            .get("/api/v1/things/1", &ApiQueryParams::new())
            .await
            .unwrap();

        assert_eq!(thing, Thing { id: "1".to_string(), name: "one".to_string() });
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_attaches_tenant_header_when_configured() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/v1/things/1")
            .match_header("x-tenant-id", "tenant-123")
            .with_status(204)
            .create_async()
            .await;

        let client = Client::with_config(
            ClientConfig::new("ls-test-key")
                .with_api_url(server.url())
                .with_tenant_id(Some("tenant-123".to_string())),
        )
        .unwrap();

        client.delete("/api/v1/things/1").await.unwrap();
        assert_eq!(client.tenant_id(), Some("tenant-123"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_sends_json_bodies_and_query_strings() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/things")
            .match_query(Matcher::UrlEncoded("upsert".into(), "true".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "one"})))
            .with_status(201)
            .with_body(r#"{"id":"1","name":"one"}"#)
            .create_async()
            .await;

        let thing: Thing = client_for(&server)
            .post_with_query(
                "/api/v1/things",
                &ApiQueryParams::new().add("upsert", true),
                &json!({"name": "one"}),
            )
            .await
            .unwrap();

        assert_eq!(thing.id, "1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_classifies_error_statuses() {
        let mut server = Server::new_async().await;
        let _missing = server
            .mock("GET", "/api/v1/things/missing")
            .with_status(404)
            .with_body(r#"{"detail":"Not Found"}"#)
            .create_async()
            .await;
        let _conflict = server
            .mock("PATCH", "/api/v1/things/1")
            .with_status(409)
            .with_body("already exists")
            .create_async()
            .await;

        let client = client_for(&server);

        let err = client
            .get::<Thing>("/api/v1/things/missing", &ApiQueryParams::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, ApiError::Api { ref body, .. } if body.contains("Not Found")));

        let err = client
            .patch::<Thing, _>("/api/v1/things/1", &json!({"name": "two"}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn empty_body_decodes_as_null() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/api/v1/things/1")
            .with_status(200)
            .with_body("")
            .expect(3)
            .create_async()
            .await;

        let client = client_for(&server);

        let _: () = client.put("/api/v1/things/1", &json!({})).await.unwrap();

        let optional: Option<Thing> = client.put("/api/v1/things/1", &json!({})).await.unwrap();
        assert!(optional.is_none());

        let err = client
            .put::<Thing, _>("/api/v1/things/1", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn delete_variants_send_query_and_body() {
        let mut server = Server::new_async().await;
        let with_query = server
            .mock("DELETE", "/api/v1/things")
            .match_query(Matcher::UrlEncoded("key".into(), "a b".into()))
            .with_status(200)
            .with_body(r#"{"deleted":true}"#)
            .create_async()
            .await;
        let with_body = server
            .mock("DELETE", "/api/v1/things/batch")
            .match_body(Matcher::Json(json!({"ids": ["1"]})))
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        client
            .delete_with_query("/api/v1/things", &ApiQueryParams::new().add("key", "a b"))
            .await
            .unwrap();
        client
            .delete_with_body("/api/v1/things/batch", &json!({"ids": ["1"]}))
            .await
            .unwrap();

        with_query.assert_async().await;
        with_body.assert_async().await;
    }

    #[tokio::test]
    async fn client_strips_trailing_slash_from_api_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/things/1")
            .with_body(r#"{"id":"1","name":"one"}"#)
            .create_async()
            .await;

        let client = Client::with_config(
            ClientConfig::new("key").with_api_url(format!("{}/", server.url())),
        )
        .unwrap();

        let _: Thing = client
            .get("/api/v1/things/1", &ApiQueryParams::new())
            .await
            .unwrap();
        assert!(!client.base_url().ends_with('/'));
        mock.assert_async().await;
    }

    #[test]
    fn client_rejects_invalid_urls() {
        assert!(matches!(
            Client::with_config(ClientConfig::new("key").with_api_url("not a url")),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::with_config(ClientConfig::new("key").with_api_url("ftp://example.com")),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::with_config(ClientConfig::new("bad\nkey")),
            Err(ApiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_debug_hides_api_key() {
        let config = ClientConfig::new("super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains(DEFAULT_API_URL));
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[tokio::test]
    async fn client_handles_network_errors() {
        let client =
            Client::with_config(ClientConfig::new("key").with_api_url("http://127.0.0.1:1")).unwrap();

        let result = client.get::<Thing>("/api/v1/things", &ApiQueryParams::new()).await;
        assert!(matches!(result, Err(ApiError::Request(_))));
    }

    #[tokio::test]
    async fn client_reports_timeouts() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/slow")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(b"{}")
            })
            .create_async()
            .await;

        let client = Client::with_config(
            ClientConfig::new("key")
                .with_api_url(server.url())
                .with_timeout(Duration::from_millis(200)),
        )
        .unwrap();

        let result = client
            .get::<serde_json::Value>("/api/v1/slow", &ApiQueryParams::new())
            .await;
        assert!(matches!(result, Err(ApiError::Timeout(_))));
    }
}
