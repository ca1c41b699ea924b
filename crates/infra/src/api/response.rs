//! Classification of non-2xx API responses

use deviceplat_domain::{DevicePlatError, ErrorDetails};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Error payload shapes the platform is known to return.
///
/// Either flat (`{"message", "type", "code"}`), OAuth style
/// (`{"error", "error_description"}`) or nested (`{"error": {...}}`).
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<Value>,
    #[serde(alias = "requestId")]
    request_id: Option<String>,
    error: Option<ErrorField>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Name(String),
    Detail(NestedError),
}

#[derive(Debug, Default, Deserialize)]
struct NestedError {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<Value>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn nested(&self) -> Option<&NestedError> {
        match &self.error {
            Some(ErrorField::Detail(nested)) => Some(nested),
            _ => None,
        }
    }

    fn error_name(&self) -> Option<&str> {
        match &self.error {
            Some(ErrorField::Name(name)) => Some(name),
            _ => None,
        }
    }

    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.nested().and_then(|n| n.message.clone()))
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error_name().map(str::to_string))
    }

    fn error_type(&self) -> Option<String> {
        self.error_type
            .clone()
            .or_else(|| self.nested().and_then(|n| n.error_type.clone()))
            .or_else(|| self.error_name().map(str::to_string))
    }

    fn code(&self) -> Option<String> {
        self.code.as_ref().or_else(|| self.nested().and_then(|n| n.code.as_ref())).map(code_string)
    }
}

fn code_string(code: &Value) -> String {
    match code {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse `Retry-After` as whole seconds; HTTP dates are ignored.
pub(crate) fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}

/// Turn a non-2xx response into the matching error variant.
///
/// 401 is an authentication failure, 429 a rate limit, anything else an API
/// error. Unparsable bodies fall back to the status line.
pub(crate) fn classify_error(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    method: &str,
    url: &str,
) -> DevicePlatError {
    let parsed = ErrorBody::parse(body);

    let message = parsed.message().unwrap_or_else(|| match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => format!("request failed with status {}", status.as_u16()),
    });
    let request_id = parsed.request_id.clone().or_else(|| {
        headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()).map(str::to_string)
    });

    let default_type = match status {
        StatusCode::UNAUTHORIZED => "authentication_error",
        StatusCode::TOO_MANY_REQUESTS => "rate_limit_error",
        _ => "api_error",
    };
    let details = ErrorDetails::new(parsed.error_type().unwrap_or_else(|| default_type.into()))
        .with_status(status.as_u16())
        .with_code(parsed.code())
        .with_request_id(request_id)
        .with_request(method, url);

    match status {
        StatusCode::UNAUTHORIZED => DevicePlatError::authentication(message, details),
        StatusCode::TOO_MANY_REQUESTS => {
            DevicePlatError::rate_limit(message, retry_after_seconds(headers), details)
        }
        _ => DevicePlatError::api(message, details),
    }
}
