//! Device authorization grant (RFC 8628)
//!
//! For clients without a browser: the user visits the verification URI on
//! another device and enters the user code while the client polls the
//! token endpoint.

use std::time::Duration;

use deviceplat_common::auth::{DeviceAuthorization, OAuthErrorBody, TokenPair};
use deviceplat_domain::constants::{
    DEVICE_FLOW_MIN_POLL_INTERVAL_MS, DEVICE_FLOW_SLOW_DOWN_STEP_SECS, GRANT_TYPE_DEVICE_CODE,
};
use deviceplat_domain::{DevicePlatError, ErrorDetails, OAuthConfig, Result};
use reqwest::StatusCode;
use tracing::{debug, info, instrument};

use super::{oauth_http_client, parse_token_pair, post_form, rejected};
use crate::auth::RefreshableTokenProvider;
use crate::http::HttpClient;

/// What a non-success poll response means for the loop.
#[derive(Debug)]
enum PollOutcome {
    Pending,
    SlowDown,
    Failed(DevicePlatError),
}

/// Device code flow bound to one OAuth configuration.
#[derive(Debug, Clone)]
pub struct DeviceCodeFlow {
    config: OAuthConfig,
    http_client: HttpClient,
    slow_down_step: Duration,
    min_poll_interval: Duration,
}

impl DeviceCodeFlow {
    /// # Errors
    ///
    /// Returns a `Config` error if the HTTP client cannot be created.
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let http_client = oauth_http_client(&config)?;
        Ok(Self {
            config,
            http_client,
            slow_down_step: Duration::from_secs(DEVICE_FLOW_SLOW_DOWN_STEP_SECS),
            min_poll_interval: Duration::from_millis(DEVICE_FLOW_MIN_POLL_INTERVAL_MS),
        })
    }

    /// Override how much `slow_down` adds to the polling interval.
    pub fn with_slow_down_step(mut self, step: Duration) -> Self {
        self.slow_down_step = step;
        self
    }

    /// Override the floor applied to the polling interval (1 s by default),
    /// which keeps an `interval` of 0 from turning into a busy loop.
    pub fn with_min_poll_interval(mut self, floor: Duration) -> Self {
        self.min_poll_interval = floor;
        self
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Request a device code and the user code to show.
    #[instrument(skip(self), fields(client_id = %self.config.client_id))]
    pub async fn initiate_device_login(&self) -> Result<DeviceAuthorization> {
        let url = self.config.device_code_url();
        let scope = self.config.scope_string();
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("scope", scope.as_str()),
            ("audience", self.config.audience.as_str()),
        ];

        let (status, body) = post_form(&self.http_client, &url, &params).await?;
        if !status.is_success() {
            return Err(rejected(
                "Device authorization",
                status,
                &body,
                &url,
                "device_authorization_failed",
            ));
        }

        let authorization: DeviceAuthorization = serde_json::from_str(&body).map_err(|e| {
            DevicePlatError::authentication(
                format!("invalid device authorization response: {e}"),
                ErrorDetails::new("invalid_device_authorization").with_request("POST", &url),
            )
        })?;

        info!(
            verification_uri = %authorization.verification_uri,
            expires_in = authorization.expires_in,
            "Device authorization started"
        );
        Ok(authorization)
    }

    /// Poll the token endpoint until the user approves or denies.
    ///
    /// Sleeps `interval` (never less than the configured floor) between polls
    /// and adds the slow-down step each time the server answers `slow_down`.
    /// Transport failures end the loop with a `Connection` error. There is
    /// no deadline of its own; the server ends the loop with `expired_token`
    /// once the device code lapses.
    #[instrument(skip(self, device_code), fields(interval_ms = interval.as_millis() as u64))]
    pub async fn poll_for_token(&self, device_code: &str, interval: Duration) -> Result<TokenPair> {
        let url = self.config.token_url();
        let params = [
            ("grant_type", GRANT_TYPE_DEVICE_CODE),
            ("device_code", device_code),
            ("client_id", self.config.client_id.as_str()),
        ];
        let mut interval = interval.max(self.min_poll_interval);
        let mut polls: u32 = 0;

        loop {
            polls += 1;
            let (status, body) = post_form(&self.http_client, &url, &params).await?;

            if status.is_success() {
                info!(polls, "Device authorization completed");
                return parse_token_pair(&body, &url);
            }

            match classify_poll(status, &body, &url) {
                PollOutcome::Pending => {
                    debug!(polls, "Authorization pending");
                }
                PollOutcome::SlowDown => {
                    interval += self.slow_down_step;
                    debug!(polls, interval_ms = interval.as_millis() as u64, "Slowing down polling");
                }
                PollOutcome::Failed(err) => return Err(err),
            }

            tokio::time::sleep(interval).await;
        }
    }

    /// Run the whole flow: initiate, hand the authorization to `prompt`
    /// (to show the user code), then poll at the server's interval.
    pub async fn authorize<F>(&self, prompt: F) -> Result<TokenPair>
    where
        F: FnOnce(&DeviceAuthorization),
    {
        let authorization = self.initiate_device_login().await?;
        prompt(&authorization);
        self.poll_for_token(&authorization.device_code, Duration::from_secs(authorization.interval))
            .await
    }

    /// Wrap tokens obtained from this flow in a refreshing provider.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the provider's HTTP client cannot be
    /// created.
    pub fn into_provider(self, tokens: TokenPair) -> Result<RefreshableTokenProvider> {
        RefreshableTokenProvider::new(tokens, self.config)
    }
}

fn classify_poll(status: StatusCode, body: &str, url: &str) -> PollOutcome {
    let oauth_error = match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            serde_json::from_str::<OAuthErrorBody>(body).ok()
        }
        _ => None,
    };

    let Some(oauth_error) = oauth_error else {
        return PollOutcome::Failed(DevicePlatError::api(
            format!("device token poll failed ({}): {}", status.as_u16(), body.trim()),
            ErrorDetails::new("device_poll_failed")
                .with_status(status.as_u16())
                .with_request("POST", url),
        ));
    };

    match oauth_error.error.as_str() {
        "authorization_pending" => PollOutcome::Pending,
        "slow_down" => PollOutcome::SlowDown,
        "expired_token" => PollOutcome::Failed(DevicePlatError::authentication(
            "device code expired before the user completed authorization",
            ErrorDetails::new("expired_token").with_status(status.as_u16()).with_request("POST", url),
        )),
        _ => PollOutcome::Failed(DevicePlatError::authentication(
            format!("device authorization failed: {oauth_error}"),
            ErrorDetails::new(oauth_error.error.clone())
                .with_status(status.as_u16())
                .with_request("POST", url),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    use deviceplat_domain::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;

    fn flow(server: &MockServer) -> DeviceCodeFlow {
        let config =
            OAuthConfig { auth_base_url: server.uri(), timeout_ms: 2_000, ..OAuthConfig::new("cli") };
        DeviceCodeFlow::new(config)
            .unwrap()
            .with_slow_down_step(Duration::from_millis(20))
            .with_min_poll_interval(Duration::from_millis(1))
    }

    fn sequence(
        responses: Vec<ResponseTemplate>,
    ) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
        let calls = AtomicUsize::new(0);
        move |_req: &Request| {
            let index = calls.fetch_add(1, Ordering::SeqCst).min(responses.len() - 1);
            responses[index].clone()
        }
    }

    #[tokio::test]
    async fn test_initiate_device_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/device/code"))
            .and(body_string_contains("client_id=cli"))
            .and(body_string_contains("scope=openid+profile+offline_access"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "device_code": "dev-1",
                "user_code": "ABCD-EFGH",
                "verification_uri": "https://login.test/activate",
                "verification_uri_complete": "https://login.test/activate?user_code=ABCD-EFGH",
                "interval": 5,
                "expires_in": 900
            })))
            .expect(1)
            .mount(&server)
            .await;

        let authorization = flow(&server).initiate_device_login().await.unwrap();

        assert_eq!(authorization.device_code, "dev-1");
        assert_eq!(authorization.user_code, "ABCD-EFGH");
        assert_eq!(authorization.interval, 5);
    }

    #[tokio::test]
    async fn test_initiate_rejected_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/device/code"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "unauthorized_client"})),
            )
            .mount(&server)
            .await;

        let err = flow(&server).initiate_device_login().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.details().unwrap().error_type, "unauthorized_client");
    }

    #[tokio::test]
    async fn test_pending_then_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("device_code=dev-1"))
            .respond_with(sequence(vec![
                ResponseTemplate::new(403).set_body_json(json!({"error": "authorization_pending"})),
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "acc", "refresh_token": "ref"})),
            ]))
            .expect(2)
            .mount(&server)
            .await;

        let started = Instant::now();
        let pair = flow(&server).poll_for_token("dev-1", Duration::from_millis(30)).await.unwrap();

        assert_eq!(pair.access_token, "acc");
        assert_eq!(pair.refresh_token.as_deref(), Some("ref"));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_zero_interval_is_raised_to_floor() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(sequence(vec![
                ResponseTemplate::new(403).set_body_json(json!({"error": "authorization_pending"})),
                ResponseTemplate::new(200).set_body_json(json!({"access_token": "acc"})),
            ]))
            .expect(2)
            .mount(&server)
            .await;

        let started = Instant::now();
        flow(&server)
            .with_min_poll_interval(Duration::from_millis(40))
            .poll_for_token("dev-1", Duration::ZERO)
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_default_floor_is_one_second() {
        let flow = DeviceCodeFlow::new(OAuthConfig::new("cli")).unwrap();
        assert_eq!(flow.min_poll_interval, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_network_failure_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = OAuthConfig {
            auth_base_url: format!("http://{addr}"),
            timeout_ms: 2_000,
            ..OAuthConfig::new("cli")
        };
        let flow = DeviceCodeFlow::new(config).unwrap();

        let err = flow.poll_for_token("dev-1", Duration::from_millis(5)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_slow_down_increases_interval() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(sequence(vec![
                ResponseTemplate::new(400).set_body_json(json!({"error": "slow_down"})),
                ResponseTemplate::new(200).set_body_json(json!({"access_token": "acc"})),
            ]))
            .expect(2)
            .mount(&server)
            .await;

        let started = Instant::now();
        flow(&server).poll_for_token("dev-1", Duration::from_millis(10)).await.unwrap();

        // 10ms interval plus one 20ms slow-down step
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_expired_token_stops_polling() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "expired_token"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = flow(&server).poll_for_token("dev-1", Duration::from_millis(5)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.details().unwrap().error_type, "expired_token");
    }

    #[tokio::test]
    async fn test_access_denied_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(403).set_body_json(
                json!({"error": "access_denied", "error_description": "User denied access"}),
            ))
            .mount(&server)
            .await;

        let err = flow(&server).poll_for_token("dev-1", Duration::from_millis(5)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.to_string().contains("User denied access"));
    }

    #[tokio::test]
    async fn test_unexpected_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let err = flow(&server).poll_for_token("dev-1", Duration::from_millis(5)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_authorize_prompts_then_polls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/device/code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "device_code": "dev-9",
                "user_code": "WXYZ",
                "verification_uri": "https://login.test/activate",
                "interval": 0,
                "expires_in": 900
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("device_code=dev-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "acc"})))
            .mount(&server)
            .await;

        let prompted = Arc::new(AtomicUsize::new(0));
        let prompted_clone = prompted.clone();
        let pair = flow(&server)
            .authorize(move |authorization| {
                assert_eq!(authorization.user_code, "WXYZ");
                prompted_clone.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();

        assert_eq!(pair.access_token, "acc");
        assert_eq!(prompted.load(Ordering::SeqCst), 1);
    }
}
