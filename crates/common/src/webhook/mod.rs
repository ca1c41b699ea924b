//! Webhook HMAC-SHA256 verification.
//!
//! The platform signs each event delivery with the endpoint secret and
//! sends `t=<unix-seconds>,v1=<hex>` alongside the raw body. Receivers pass
//! the untouched body, the header and the secret to [`construct_event`] and
//! get back the parsed event, or a [`WebhookError`] naming why it was
//! rejected.
//!
//! ```
//! use deviceplat_common::webhook::{construct_event, generate_test_header_string, TestHeaderOptions, WebhookOptions};
//!
//! let payload = r#"{"type":"device.online","id":"evt_1"}"#;
//! let header = generate_test_header_string(TestHeaderOptions::new(payload, "whsec")).unwrap();
//! let event: serde_json::Value =
//!     construct_event(payload, &header, "whsec", WebhookOptions::default()).unwrap();
//! assert_eq!(event["type"], "device.online");
//! ```

mod error;
pub mod signature;
mod testing;

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;

pub use error::WebhookError;
pub use signature::{compute_signature, verify_signature, SignatureHeader};
pub use testing::{generate_test_header_string, TestHeaderOptions};

/// Default age after which a delivery is considered replayed.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// Verification options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookOptions {
    /// Maximum accepted age of the signed timestamp
    pub tolerance: Duration,
}

impl Default for WebhookOptions {
    fn default() -> Self {
        Self { tolerance: DEFAULT_TOLERANCE }
    }
}

impl WebhookOptions {
    /// Options with a tolerance expressed in seconds.
    #[must_use]
    pub fn with_tolerance_seconds(seconds: u64) -> Self {
        Self { tolerance: Duration::from_secs(seconds) }
    }
}

/// Verify a webhook delivery and parse its payload.
///
/// Checks, in order: header format, timestamp age, signature, JSON payload.
///
/// # Errors
/// Returns the [`WebhookError`] variant for the first check that fails.
pub fn construct_event<T: DeserializeOwned>(
    payload: &str,
    signature_header: &str,
    secret: &str,
    options: WebhookOptions,
) -> Result<T, WebhookError> {
    construct_event_at(payload, signature_header, secret, options, Utc::now().timestamp())
}

/// [`construct_event`] against an explicit clock (unix seconds).
///
/// # Errors
/// Same as [`construct_event`].
pub fn construct_event_at<T: DeserializeOwned>(
    payload: &str,
    signature_header: &str,
    secret: &str,
    options: WebhookOptions,
    now: i64,
) -> Result<T, WebhookError> {
    verify_signature(payload, signature_header, secret, options.tolerance, now)?;
    serde_json::from_str(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
}

/// Endpoint-bound verifier holding the signing secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    options: WebhookOptions,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl WebhookVerifier {
    /// Create a verifier with the default tolerance.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into(), options: WebhookOptions::default() }
    }

    /// Override the tolerance window.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.options.tolerance = tolerance;
        self
    }

    /// Verify and parse one delivery.
    ///
    /// # Errors
    /// See [`construct_event`].
    pub fn construct_event<T: DeserializeOwned>(
        &self,
        payload: &str,
        signature_header: &str,
    ) -> Result<T, WebhookError> {
        construct_event(payload, signature_header, &self.secret, self.options)
    }
}
