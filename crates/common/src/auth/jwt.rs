//! Access token expiry inspection
//!
//! Reads the `exp` claim from the payload segment of a JWT access token.
//! The signature is not verified; the claim is only used to decide when a
//! refresh is due, the API remains the authority on token validity.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Tokens expiring within this window are reported as already expired.
pub const EXPIRY_SAFETY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<f64>,
}

/// Check whether an access token is expired or about to expire.
///
/// Equivalent to [`is_token_expired_at`] with the current time.
#[must_use]
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now())
}

/// Check whether an access token is expired relative to `now`.
///
/// Returns `true` when `exp * 1000 < now_ms + 30_000`, and also when the
/// token has no payload segment, the payload is not base64url JSON, or the
/// `exp` claim is missing or not numeric.
#[must_use]
pub fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    let Some(exp) = decode_exp(token) else {
        return true;
    };

    let margin_ms = EXPIRY_SAFETY_MARGIN.as_millis() as f64;
    let now_ms = now.timestamp_millis() as f64;
    exp * 1000.0 < now_ms + margin_ms
}

/// Absolute expiry of an access token, if its `exp` claim is readable.
#[must_use]
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    let exp = decode_exp(token)?;
    Utc.timestamp_opt(exp.trunc() as i64, 0).single()
}

fn decode_exp(token: &str) -> Option<f64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    claim.exp.filter(|exp| exp.is_finite())
}
