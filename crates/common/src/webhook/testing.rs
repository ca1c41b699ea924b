//! Header generation for exercising webhook receivers locally.

use chrono::Utc;

use super::error::WebhookError;
use super::signature::{compute_signature, SignatureHeader};

/// Inputs for [`generate_test_header_string`].
#[derive(Debug, Clone)]
pub struct TestHeaderOptions<'a> {
    /// Raw payload exactly as it will be delivered
    pub payload: &'a str,
    /// Endpoint signing secret
    pub secret: &'a str,
    /// Signing time in unix seconds; `None` means now
    pub timestamp: Option<i64>,
}

impl<'a> TestHeaderOptions<'a> {
    #[must_use]
    pub fn new(payload: &'a str, secret: &'a str) -> Self {
        Self { payload, secret, timestamp: None }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Produce a correctly signed `t=...,v1=...` header for `payload`.
///
/// Intended for tests and local tooling, never for verifying deliveries.
///
/// # Errors
/// Returns [`WebhookError::InvalidSecret`] if the secret cannot key the MAC.
pub fn generate_test_header_string(options: TestHeaderOptions<'_>) -> Result<String, WebhookError> {
    let timestamp = options.timestamp.unwrap_or_else(|| Utc::now().timestamp());
    let signature = compute_signature(options.payload, options.secret, timestamp)?;
    Ok(SignatureHeader { timestamp, signature }.to_string())
}
