//! Signature header parsing and HMAC-SHA256 verification.
//!
//! Header format: `t=<unix-seconds>,v1=<hex-hmac-sha256>`.
//! Signed content: `"{t}.{raw_payload}"`.

use std::str::FromStr;
use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Parsed `t=...,v1=...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp (seconds) the sender signed at
    pub timestamp: i64,
    /// Hex-encoded HMAC-SHA256 signature
    pub signature: String,
}

impl FromStr for SignatureHeader {
    type Err = WebhookError;

    fn from_str(header: &str) -> Result<Self, Self::Err> {
        if header.trim().is_empty() {
            return Err(WebhookError::InvalidHeader("header is empty".into()));
        }

        let mut timestamp = None;
        let mut signature = None;

        for pair in header.split(',') {
            let Some((key, value)) = pair.trim().split_once('=') else {
                continue;
            };
            match key.trim() {
                "t" => {
                    let parsed = value.trim().parse::<i64>().map_err(|_| {
                        WebhookError::InvalidHeader(format!("timestamp '{value}' is not an integer"))
                    })?;
                    timestamp = Some(parsed);
                }
                "v1" => signature = Some(value.trim().to_string()),
                _ => {}
            }
        }

        match (timestamp, signature) {
            (Some(timestamp), Some(signature)) if !signature.is_empty() => {
                Ok(Self { timestamp, signature })
            }
            (None, _) => Err(WebhookError::InvalidHeader("missing 't' timestamp".into())),
            _ => Err(WebhookError::InvalidHeader("missing 'v1' signature".into())),
        }
    }
}

impl std::fmt::Display for SignatureHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={},v1={}", self.timestamp, self.signature)
    }
}

/// Hex-encoded HMAC-SHA256 of `"{timestamp}.{payload}"` keyed by `secret`.
///
/// # Errors
/// Returns [`WebhookError::InvalidSecret`] if the key is rejected by the MAC.
pub fn compute_signature(payload: &str, secret: &str, timestamp: i64) -> Result<String, WebhookError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| WebhookError::InvalidSecret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify `header` against `payload` at the given `now` (unix seconds).
///
/// A delivery exactly `tolerance` seconds old is accepted; one second older
/// is rejected. Timestamps in the future are not bounded.
///
/// # Errors
/// [`WebhookError::InvalidHeader`], [`WebhookError::TimestampOutsideTolerance`]
/// or [`WebhookError::SignatureMismatch`].
pub fn verify_signature(
    payload: &str,
    header: &str,
    secret: &str,
    tolerance: Duration,
    now: i64,
) -> Result<SignatureHeader, WebhookError> {
    let parsed: SignatureHeader = header.parse()?;

    let age_seconds = now.saturating_sub(parsed.timestamp);
    let tolerance_seconds = tolerance.as_secs();
    if age_seconds > i64::try_from(tolerance_seconds).unwrap_or(i64::MAX) {
        return Err(WebhookError::TimestampOutsideTolerance { age_seconds, tolerance_seconds });
    }

    let expected = compute_signature(payload, secret, parsed.timestamp)?;
    if !constant_time_eq(expected.as_bytes(), parsed.signature.as_bytes()) {
        return Err(WebhookError::SignatureMismatch);
    }

    Ok(parsed)
}

/// Constant-time comparison of two byte slices.
///
/// Length is compared first; both inputs are fixed-size hex digests.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
