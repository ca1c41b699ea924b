//! Error types surfaced by the SDK
//!
//! Errors are constructed once, where the failure is detected, and travel
//! up unchanged. Callers branch on [`DevicePlatError::kind`] to pick a
//! remedy (re-authenticate, back off, fix configuration).

use deviceplat_common::webhook::WebhookError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type tag used for transport timeouts.
pub const TIMEOUT_ERROR_TYPE: &str = "timeout";

/// Request context attached to every networked error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// HTTP status, absent when no response was received
    pub status_code: Option<u16>,
    /// Error type reported by the server, or a local tag
    #[serde(rename = "type")]
    pub error_type: String,
    /// Machine-readable error code from the server
    pub code: Option<String>,
    /// Server-assigned request id for support tickets
    pub request_id: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
}

impl ErrorDetails {
    #[must_use]
    pub fn new(error_type: impl Into<String>) -> Self {
        Self { error_type: error_type.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    #[must_use]
    pub fn with_request(mut self, method: impl Into<String>, url: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.url = Some(url.into());
        self
    }
}

/// Error categories, one per [`DevicePlatError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Authentication,
    RateLimit,
    Api,
    Connection,
    Webhook,
    Config,
    Serialization,
}

/// Main error type for the DevicePlat SDK
#[derive(Error, Debug, Clone)]
pub enum DevicePlatError {
    /// 401 from the API, or a credential rejected by the OAuth server.
    #[error("Authentication error: {message}")]
    Authentication { message: String, details: ErrorDetails },

    /// 429 from the API.
    #[error("Rate limit exceeded: {message}")]
    RateLimit { message: String, retry_after: Option<u64>, details: ErrorDetails },

    /// Any other non-2xx response.
    #[error("API error: {message}")]
    Api { message: String, details: ErrorDetails },

    /// No HTTP response at all (DNS, refused connection, timeout).
    #[error("Connection error: {message}")]
    Connection { message: String, details: ErrorDetails },

    #[error("Webhook verification failed: {0}")]
    Webhook(#[from] WebhookError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DevicePlatError {
    pub fn authentication(message: impl Into<String>, details: ErrorDetails) -> Self {
        Self::Authentication { message: message.into(), details }
    }

    pub fn rate_limit(
        message: impl Into<String>,
        retry_after: Option<u64>,
        details: ErrorDetails,
    ) -> Self {
        Self::RateLimit { message: message.into(), retry_after, details }
    }

    pub fn api(message: impl Into<String>, details: ErrorDetails) -> Self {
        Self::Api { message: message.into(), details }
    }

    pub fn connection(message: impl Into<String>, details: ErrorDetails) -> Self {
        Self::Connection { message: message.into(), details }
    }

    /// Get the error category for this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Api { .. } => ErrorKind::Api,
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Webhook(_) => ErrorKind::Webhook,
            Self::Config(_) => ErrorKind::Config,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Request context, for the networked variants.
    #[must_use]
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Self::Authentication { details, .. }
            | Self::RateLimit { details, .. }
            | Self::Api { details, .. }
            | Self::Connection { details, .. } => Some(details),
            Self::Webhook(_) | Self::Config(_) | Self::Serialization(_) => None,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.details().and_then(|d| d.status_code)
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.details().and_then(|d| d.request_id.as_deref())
    }

    /// Server-requested delay in seconds, for rate-limit errors.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Whether the failure was a transport timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Connection { details, .. } if details.error_type == TIMEOUT_ERROR_TYPE)
    }

    /// Whether the request pipeline may retry this error.
    ///
    /// Rate-limit and API errors are transient; of the connection errors
    /// only timeouts are. Everything else surfaces immediately.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            ErrorKind::RateLimit | ErrorKind::Api => true,
            ErrorKind::Connection => self.is_timeout(),
            ErrorKind::Authentication
            | ErrorKind::Webhook
            | ErrorKind::Config
            | ErrorKind::Serialization => false,
        }
    }
}

impl From<serde_json::Error> for DevicePlatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for DevicePlat operations
pub type Result<T> = std::result::Result<T, DevicePlatError>;
