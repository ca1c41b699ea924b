//! Configuration structures
//!
//! Durations are stored as milliseconds so the structs round-trip through
//! JSON/TOML files and environment variables unchanged.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUDIENCE, DEFAULT_AUTH_BASE_URL, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_MAX_DELAY_MS, DEFAULT_RETRY_MAX_JITTER_MS,
    DEFAULT_SCOPES, DEFAULT_TIMEOUT_MS,
};

/// Backoff applied between request retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub base_delay_ms: u64,
    pub max_jitter_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            max_jitter_ms: DEFAULT_RETRY_MAX_JITTER_MS,
            max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt + 1`, given a jitter sample.
    ///
    /// `min(base * 2^attempt + jitter, max)`; `jitter_ms` is clamped to
    /// `max_jitter_ms`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32, jitter_ms: u64) -> Duration {
        let exponential = self.base_delay_ms.saturating_mul(1u64 << attempt.min(32));
        let delay = exponential.saturating_add(jitter_ms.min(self.max_jitter_ms));
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

/// Configuration for the API request pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Per-request timeout
    pub timeout_ms: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Headers added to every request, overridable per call
    pub headers: BTreeMap<String, String>,
    pub retry: RetryConfig,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            headers: BTreeMap::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl ApiClientConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// OAuth configuration for the platform's authorization server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Authorization server base (e.g. "https://login.example-device-platform.com")
    pub auth_base_url: String,
    /// OAuth client ID
    pub client_id: String,
    /// API identifier requested as `audience`
    pub audience: String,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
    /// Redirect URI for the browser flow
    pub redirect_uri: Option<String>,
    /// Timeout for every call to the authorization server
    pub timeout_ms: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            client_id: String::new(),
            audience: DEFAULT_AUDIENCE.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
            redirect_uri: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl OAuthConfig {
    /// Default configuration for a client id.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), ..Self::default() }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `{auth_base_url}/authorize`
    #[must_use]
    pub fn authorization_url(&self) -> String {
        format!("{}/authorize", self.auth_base_url.trim_end_matches('/'))
    }

    /// `{auth_base_url}/oauth/token`
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.auth_base_url.trim_end_matches('/'))
    }

    /// `{auth_base_url}/oauth/device/code`
    #[must_use]
    pub fn device_code_url(&self) -> String {
        format!("{}/oauth/device/code", self.auth_base_url.trim_end_matches('/'))
    }

    /// Get scopes as space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

/// Top-level SDK configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    pub api: ApiClientConfig,
    pub auth: OAuthConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SdkConfig::default();
        assert_eq!(config.api.base_url, "https://api.example-device-platform.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.auth.timeout(), Duration::from_secs(30));
        assert_eq!(config.auth.scope_string(), "openid profile offline_access");
    }

    #[test]
    fn test_oauth_urls_tolerate_trailing_slash() {
        let config = OAuthConfig {
            auth_base_url: "https://login.test/".into(),
            ..OAuthConfig::new("client")
        };
        assert_eq!(config.authorization_url(), "https://login.test/authorize");
        assert_eq!(config.token_url(), "https://login.test/oauth/token");
        assert_eq!(config.device_code_url(), "https://login.test/oauth/device/code");
    }

    #[test]
    fn test_backoff_delay_grows_and_caps() {
        let retry = RetryConfig::default();
        assert_eq!(retry.backoff_delay(0, 0), Duration::from_millis(1_000));
        assert_eq!(retry.backoff_delay(1, 250), Duration::from_millis(2_250));
        assert_eq!(retry.backoff_delay(2, 999), Duration::from_millis(4_999));
        assert_eq!(retry.backoff_delay(3, 1_000), Duration::from_millis(9_000));
        assert_eq!(retry.backoff_delay(4, 0), Duration::from_millis(10_000));
        assert_eq!(retry.backoff_delay(63, 0), Duration::from_millis(10_000));
        // jitter is clamped to max_jitter_ms
        assert_eq!(retry.backoff_delay(0, 50_000), Duration::from_millis(2_000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SdkConfig =
            serde_json::from_str(r#"{"api":{"max_retries":5},"auth":{"client_id":"abc"}}"#).unwrap();
        assert_eq!(config.api.max_retries, 5);
        assert_eq!(config.api.timeout_ms, 30_000);
        assert_eq!(config.auth.client_id, "abc");
        assert_eq!(config.auth.audience, "https://api.example-device-platform.com");
    }
}
