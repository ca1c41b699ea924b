use thiserror::Error;

/// Reasons an inbound webhook is rejected.
///
/// Each variant is a distinct failure so receivers can tell a replayed or
/// stale delivery apart from a forged one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// Header missing, empty, or lacking `t` / `v1`.
    #[error("invalid webhook signature header: {0}")]
    InvalidHeader(String),

    /// Timestamp older than the tolerance window.
    #[error("webhook timestamp outside the tolerance zone ({age_seconds}s old, tolerance {tolerance_seconds}s)")]
    TimestampOutsideTolerance { age_seconds: i64, tolerance_seconds: u64 },

    /// `v1` does not match the HMAC of the payload.
    #[error("webhook signature does not match the expected signature for payload")]
    SignatureMismatch,

    /// Signature was valid but the payload is not JSON of the expected shape.
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// The signing secret could not key the HMAC.
    #[error("invalid webhook secret")]
    InvalidSecret,
}

impl WebhookError {
    /// Stable string tag for the failure.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidHeader(_) => "webhook_header_invalid",
            Self::TimestampOutsideTolerance { .. } => "webhook_timestamp_out_of_tolerance",
            Self::SignatureMismatch => "webhook_signature_mismatch",
            Self::InvalidPayload(_) => "webhook_payload_invalid",
            Self::InvalidSecret => "webhook_secret_invalid",
        }
    }
}
