#![allow(dead_code)]

use std::sync::{Arc, Once};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use deviceplat_domain::{ApiClientConfig, OAuthConfig, RetryConfig};
use deviceplat_infra::{ApiClient, StaticTokenProvider};
use wiremock::{MockServer, Request, ResponseTemplate};

static TRACING: Once = Once::new();

/// Route SDK tracing to the test output; `RUST_LOG` selects the level.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Unsigned JWT whose `exp` claim is `seconds` from now.
pub fn jwt_expiring_in(seconds: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + seconds;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"user-1","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}

/// API config pointed at a mock server with millisecond backoff.
pub fn api_config(server: &MockServer, max_retries: u32) -> ApiClientConfig {
    ApiClientConfig {
        base_url: server.uri(),
        timeout_ms: 2_000,
        max_retries,
        retry: RetryConfig { base_delay_ms: 5, max_jitter_ms: 5, max_delay_ms: 40 },
        ..ApiClientConfig::default()
    }
}

pub fn oauth_config(server: &MockServer) -> OAuthConfig {
    OAuthConfig {
        auth_base_url: server.uri(),
        redirect_uri: Some("http://localhost:8765/callback".to_string()),
        timeout_ms: 2_000,
        ..OAuthConfig::new("sdk-tests")
    }
}

pub fn static_client(server: &MockServer, max_retries: u32) -> ApiClient {
    ApiClient::new(api_config(server, max_retries), Arc::new(StaticTokenProvider::new("test-token")))
        .expect("api client should build")
}

/// Responder replaying `responses` in order, repeating the last one.
pub fn sequence(
    responses: Vec<ResponseTemplate>,
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    let calls = std::sync::atomic::AtomicUsize::new(0);
    move |_req: &Request| {
        let index = calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            .min(responses.len().saturating_sub(1));
        responses[index].clone()
    }
}

