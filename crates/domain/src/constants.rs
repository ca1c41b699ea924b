//! SDK constants
//!
//! Centralized defaults for endpoints, timeouts and the retry policy.

// Endpoints
pub const DEFAULT_BASE_URL: &str = "https://api.example-device-platform.com";
pub const DEFAULT_AUTH_BASE_URL: &str = "https://login.example-device-platform.com";
pub const DEFAULT_AUDIENCE: &str = DEFAULT_BASE_URL;
pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "profile", "offline_access"];

// Transport
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const USER_AGENT: &str = concat!("deviceplat-sdk-rust/", env!("CARGO_PKG_VERSION"));
pub const JSON_CONTENT_TYPE: &str = "application/json";

// Retry policy: min(base * 2^attempt + jitter, max)
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_RETRY_MAX_JITTER_MS: u64 = 1_000;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 10_000;

// OAuth grant types
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
pub const GRANT_TYPE_DEVICE_CODE: &str = "urn:ietf:params:oauth:grant-type:device_code";

// Device flow polling
pub const DEVICE_FLOW_SLOW_DOWN_STEP_SECS: u64 = 5;
pub const DEVICE_FLOW_MIN_POLL_INTERVAL_MS: u64 = 1_000;
