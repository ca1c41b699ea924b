//! OAuth flows against the platform's authorization server
//!
//! - [`refresh_access_token`]: exchange a refresh token for a new pair
//! - [`DeviceCodeFlow`]: RFC 8628 device authorization for headless clients
//! - [`BrowserPkceFlow`]: authorization code flow with PKCE
//!
//! Every call goes through an [`HttpClient`] built with
//! `OAuthConfig::timeout` and is attempted once; the flows do not retry.

pub mod browser;
pub mod device_code;
pub mod refresh;

pub use browser::{AuthorizationRequest, BrowserPkceFlow};
pub use device_code::DeviceCodeFlow;
pub use refresh::refresh_access_token;

use deviceplat_common::auth::{OAuthErrorBody, TokenPair};
use deviceplat_domain::{DevicePlatError, ErrorDetails, OAuthConfig, Result};
use reqwest::{Method, StatusCode};

use crate::http::HttpClient;

pub(crate) fn oauth_http_client(config: &OAuthConfig) -> Result<HttpClient> {
    HttpClient::builder().timeout(config.timeout()).build()
}

/// POST a form body once and buffer the response text.
pub(crate) async fn post_form(
    http_client: &HttpClient,
    url: &str,
    params: &[(&str, &str)],
) -> Result<(StatusCode, String)> {
    http_client.send_for_text(http_client.request(Method::POST, url).form(params)).await
}

/// Authentication error for a rejected OAuth call, keeping the response body
/// text in the message.
pub(crate) fn rejected(
    operation: &str,
    status: StatusCode,
    body: &str,
    url: &str,
    fallback_type: &str,
) -> DevicePlatError {
    let error_type = serde_json::from_str::<OAuthErrorBody>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| fallback_type.to_string());

    DevicePlatError::authentication(
        format!("{operation} failed ({}): {}", status.as_u16(), body.trim()),
        ErrorDetails::new(error_type).with_status(status.as_u16()).with_request("POST", url),
    )
}

/// Decode a token endpoint success body.
pub(crate) fn parse_token_pair(body: &str, url: &str) -> Result<TokenPair> {
    serde_json::from_str(body).map_err(|e| {
        DevicePlatError::authentication(
            format!("invalid token response: {e}"),
            ErrorDetails::new("invalid_token_response").with_request("POST", url),
        )
    })
}

#[cfg(test)]
mod tests {
    use deviceplat_domain::ErrorKind;

    use super::*;

    #[test]
    fn test_rejected_reads_oauth_error_name() {
        let err = rejected(
            "Token refresh",
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"revoked"}"#,
            "https://auth/oauth/token",
            "token_refresh_failed",
        );

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.details().unwrap().error_type, "invalid_grant");
        assert!(err.to_string().contains("revoked"));
    }

    #[test]
    fn test_rejected_falls_back_for_plain_text() {
        let err = rejected(
            "Token refresh",
            StatusCode::BAD_GATEWAY,
            "upstream down",
            "https://auth/oauth/token",
            "token_refresh_failed",
        );

        assert_eq!(err.details().unwrap().error_type, "token_refresh_failed");
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.to_string(), "Authentication error: Token refresh failed (502): upstream down");
    }

    #[test]
    fn test_parse_token_pair_rejects_garbage() {
        let err = parse_token_pair("<html>", "https://auth/oauth/token").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);

        let pair = parse_token_pair(r#"{"access_token":"a"}"#, "https://auth/oauth/token").unwrap();
        assert_eq!(pair.access_token, "a");
        assert!(pair.refresh_token.is_none());
    }
}
