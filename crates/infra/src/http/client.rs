use std::time::Duration;

use deviceplat_domain::constants::{DEFAULT_TIMEOUT_MS, USER_AGENT};
use deviceplat_domain::DevicePlatError;
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response, StatusCode};
use tracing::debug;

use crate::errors::{client_build_error, transport_error};

/// Thin `reqwest` wrapper performing exactly one attempt per send.
///
/// Retries belong to the caller; the API pipeline and the OAuth flows each
/// apply their own policy on top of this transport.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, DevicePlatError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send the request once.
    ///
    /// Any HTTP status is returned as `Ok`; only transport failures become
    /// errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, DevicePlatError> {
        let request = builder.build().map_err(|err| client_build_error(&err))?;
        self.execute(request).await
    }

    /// Send the request once and buffer the body as text.
    pub async fn send_for_text(
        &self,
        builder: RequestBuilder,
    ) -> Result<(StatusCode, String), DevicePlatError> {
        let request = builder.build().map_err(|err| client_build_error(&err))?;
        let method = request.method().clone();

        let response = self.execute(request).await?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|err| transport_error(&err, method.as_str(), &url))?;

        Ok((status, body))
    }

    async fn execute(&self, request: Request) -> Result<Response, DevicePlatError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(transport_error(&err, method.as_str(), url.as_str()))
            }
        }
    }
}

/// Builder for [`HttpClient`].
///
/// Every client sends the SDK user agent and ignores proxy settings from
/// the environment.
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS) }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpClient, DevicePlatError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(|err| client_build_error(&err))?;

        Ok(HttpClient { client })
    }
}
