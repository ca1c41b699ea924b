//! Conversions from `reqwest` failures into domain errors.

use deviceplat_domain::{DevicePlatError, ErrorDetails, TIMEOUT_ERROR_TYPE};
use reqwest::Error as HttpError;

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DevicePlatError */
/* -------------------------------------------------------------------------- */

/// Map a failed send or body read into a `Connection` error.
///
/// Timeouts carry `error_type == "timeout"` so the pipeline can retry them;
/// every other transport failure gets a descriptive tag and is final.
pub fn transport_error(err: &HttpError, method: &str, url: &str) -> DevicePlatError {
    let (error_type, message) = if err.is_timeout() {
        (TIMEOUT_ERROR_TYPE, format!("{method} {url} timed out"))
    } else if is_connect(err) {
        ("connect", format!("could not connect to {url}: {err}"))
    } else if err.is_body() || err.is_decode() {
        ("body", format!("failed to read response body from {url}: {err}"))
    } else {
        ("network", format!("{method} {url} failed: {err}"))
    };

    DevicePlatError::connection(message, ErrorDetails::new(error_type).with_request(method, url))
}

/// Map a client or request construction failure into a `Config` error.
pub fn client_build_error(err: &HttpError) -> DevicePlatError {
    DevicePlatError::Config(format!("invalid HTTP client configuration: {err}"))
}

#[cfg(not(target_arch = "wasm32"))]
fn is_connect(err: &HttpError) -> bool {
    err.is_connect()
}

#[cfg(target_arch = "wasm32")]
fn is_connect(_err: &HttpError) -> bool {
    false
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
