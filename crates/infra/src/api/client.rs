//! API client with retry and error classification
//!
//! Every call runs through one pipeline: build the URL, fetch a token,
//! assemble headers, send, classify non-2xx responses and retry transient
//! failures with exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use deviceplat_domain::constants::{JSON_CONTENT_TYPE, USER_AGENT};
use deviceplat_domain::{ApiClientConfig, DevicePlatError, Result};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::request::RequestOptions;
use super::response::classify_error;
use crate::auth::AccessTokenProvider;
use crate::errors::transport_error;
use crate::http::HttpClient;

/// API client for the device platform REST API
///
/// Cheap to clone; clones share the transport and the token provider.
#[derive(Clone)]
pub struct ApiClient {
    http_client: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    config: Arc<ApiClientConfig>,
    base_url: Url,
    default_headers: HeaderMap,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("max_retries", &self.config.max_retries)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the base URL or a configured header is
    /// invalid, or the HTTP client cannot be created.
    pub fn new(config: ApiClientConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            DevicePlatError::Config(format!("invalid base URL '{}': {e}", config.base_url))
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        default_headers.insert(reqwest::header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        for (name, value) in &config.headers {
            let (name, value) = header_pair(name, value)?;
            default_headers.insert(name, value);
        }

        let http_client = HttpClient::builder().timeout(config.timeout()).build()?;

        Ok(Self { http_client, auth, config: Arc::new(config), base_url, default_headers })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Run a request through the pipeline and decode the JSON response.
    ///
    /// Authentication, configuration and non-timeout connection failures
    /// surface immediately. Rate limits, other API errors and timeouts are
    /// retried up to `max_retries` times; the last error is returned once
    /// retries run out. An empty success body decodes from `null`.
    #[instrument(skip(self, options), fields(method = %options.method, path = %path))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let url = self.build_url(path, &options.query)?;
        let max_retries = self.config.max_retries;
        let mut attempt: u32 = 0;

        loop {
            debug!(attempt = attempt + 1, %url, "executing API request");

            match self.execute::<T>(&url, &options).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_retries => {
                    let delay = self.retry_delay(&err, attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries,
                        kind = ?err.kind(),
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, kind = ?err.kind(), "request failed");
                    return Err(err);
                }
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(path, RequestOptions::new()).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(path, RequestOptions::new().method(Method::POST).json(body)?).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(path, RequestOptions::new().method(Method::PUT).json(body)?).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(path, RequestOptions::new().method(Method::PATCH).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(path, RequestOptions::new().method(Method::DELETE)).await
    }

    /// One attempt: token, headers, send, classify, decode.
    async fn execute<T: DeserializeOwned>(&self, url: &Url, options: &RequestOptions) -> Result<T> {
        let token = self.auth.access_token().await?;
        let headers = self.assemble_headers(options, &token)?;

        let mut builder =
            self.http_client.request(options.method.clone(), url.clone()).headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(body.to_bytes()?);
        }

        let response = self.http_client.send(builder).await?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(&err, options.method.as_str(), url.as_str()))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(classify_error(
                status,
                &response_headers,
                &text,
                options.method.as_str(),
                url.as_str(),
            ));
        }

        let parsed = if body.is_empty() {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&body)
        };
        parsed.map_err(|e| {
            DevicePlatError::Serialization(format!("failed to decode response from {url}: {e}"))
        })
    }

    /// Defaults, then configured headers, then caller headers, then the
    /// bearer token. Binary bodies drop the JSON content type.
    fn assemble_headers(&self, options: &RequestOptions, token: &str) -> Result<HeaderMap> {
        let mut headers = self.default_headers.clone();

        if let Some(body) = options.body.as_ref().filter(|body| body.is_binary()) {
            if headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) == Some(JSON_CONTENT_TYPE)
            {
                headers.remove(CONTENT_TYPE);
            }
            if let Some(content_type) = body.content_type() {
                let (name, value) = header_pair(CONTENT_TYPE.as_str(), content_type)?;
                headers.insert(name, value);
            }
        }

        for (name, value) in &options.headers {
            let (name, value) = header_pair(name, value)?;
            headers.insert(name, value);
        }

        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            DevicePlatError::Config("access token contains invalid header characters".into())
        })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        Ok(headers)
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let path = path.trim_start_matches('/');
        let raw = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        let mut url = Url::parse(&raw)
            .map_err(|e| DevicePlatError::Config(format!("invalid request URL '{raw}': {e}")))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// `Retry-After` when the server sent one, otherwise jittered
    /// exponential backoff.
    fn retry_delay(&self, err: &DevicePlatError, attempt: u32) -> Duration {
        if let Some(seconds) = err.retry_after() {
            return Duration::from_secs(seconds);
        }

        let max_jitter = self.config.retry.max_jitter_ms;
        let jitter = if max_jitter == 0 { 0 } else { rand::thread_rng().gen_range(0..=max_jitter) };
        self.config.retry.backoff_delay(attempt, jitter)
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| DevicePlatError::Config(format!("invalid header name '{name}': {e}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| DevicePlatError::Config(format!("invalid value for header '{name}': {e}")))?;
    Ok((header_name, header_value))
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the auth provider is missing or client creation fails
    pub fn build(self) -> Result<ApiClient> {
        let config = self.config.unwrap_or_default();
        let auth =
            self.auth.ok_or_else(|| DevicePlatError::Config("Auth provider not set".to_string()))?;

        ApiClient::new(config, auth)
    }
}
