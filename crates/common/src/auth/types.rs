//! OAuth 2.0 types and structures
//!
//! Wire shapes returned by the platform's authorization server
//! (`/oauth/token`, `/oauth/device/code`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::jwt;

/// Access and refresh token pair issued by the authorization server.
///
/// Fields the server did not send stay `None`; nothing is defaulted. A pair
/// is never mutated after issue, a refresh produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Access token lifetime in seconds, as reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    /// Token type (normally "Bearer")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenPair {
    /// Create a pair from an access token and refresh token.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: Some(refresh_token.into()),
            expires_in: None,
            token_type: None,
        }
    }

    /// Whether the access token is expired or inside the safety margin.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        jwt::is_token_expired(&self.access_token)
    }
}

/// OAuth error response from authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2, RFC 8628 §3.5).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthErrorBody {}

fn default_poll_interval() -> u64 {
    5
}

/// Device authorization response (RFC 8628 §3.2).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceAuthorization {
    /// Opaque code the client polls with
    pub device_code: String,
    /// Short code the user types on the verification page
    pub user_code: String,
    /// Page where the user enters `user_code`
    pub verification_uri: String,
    /// Verification page with the user code pre-filled
    #[serde(default)]
    pub verification_uri_complete: Option<String>,
    /// Minimum seconds between polls
    #[serde(default = "default_poll_interval")]
    pub interval: u64,
    /// Seconds until `device_code` expires
    pub expires_in: u64,
}
