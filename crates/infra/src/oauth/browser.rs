//! Authorization code flow with PKCE for clients that can open a browser

use deviceplat_common::auth::{PkceChallenge, TokenPair};
use deviceplat_domain::constants::GRANT_TYPE_AUTHORIZATION_CODE;
use deviceplat_domain::{DevicePlatError, OAuthConfig, Result};
use tracing::{debug, info, instrument};

use super::{oauth_http_client, parse_token_pair, post_form, rejected};
use crate::auth::RefreshableTokenProvider;
use crate::http::HttpClient;

/// Authorization URL plus the secrets the caller must keep until the
/// redirect comes back.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// URL to open in the user's browser
    pub url: String,
    /// PKCE verifier for [`BrowserPkceFlow::exchange_code_for_tokens`]
    pub code_verifier: String,
    /// CSRF state echoed back on the redirect
    pub state: String,
}

impl AuthorizationRequest {
    /// Whether the `state` from the redirect matches.
    #[must_use]
    pub fn matches_state(&self, state: &str) -> bool {
        self.state == state
    }
}

impl std::fmt::Debug for AuthorizationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationRequest")
            .field("url", &self.url)
            .field("code_verifier", &"<redacted>")
            .field("state", &self.state)
            .finish()
    }
}

/// Browser login bound to one OAuth configuration with a redirect URI.
#[derive(Debug, Clone)]
pub struct BrowserPkceFlow {
    config: OAuthConfig,
    redirect_uri: String,
    http_client: HttpClient,
}

impl BrowserPkceFlow {
    /// # Errors
    ///
    /// Returns a `Config` error if `redirect_uri` is not set or the HTTP
    /// client cannot be created.
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let redirect_uri = config.redirect_uri.clone().ok_or_else(|| {
            DevicePlatError::Config("redirect_uri is required for the browser flow".into())
        })?;
        let http_client = oauth_http_client(&config)?;
        Ok(Self { config, redirect_uri, http_client })
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Build the authorization URL with a fresh PKCE challenge and state.
    #[must_use]
    pub fn generate_auth_url(&self) -> AuthorizationRequest {
        let challenge = PkceChallenge::generate();
        let scope = self.config.scope_string();

        let params = [
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("audience", self.config.audience.as_str()),
            ("state", challenge.state.as_str()),
            ("code_challenge", challenge.code_challenge.as_str()),
            ("code_challenge_method", challenge.challenge_method()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}?{}", self.config.authorization_url(), query_string);
        debug!(client_id = %self.config.client_id, "Generated authorization URL");

        AuthorizationRequest { url, code_verifier: challenge.code_verifier, state: challenge.state }
    }

    /// Exchange the code from the redirect for tokens.
    ///
    /// Validate the redirect's `state` with
    /// [`AuthorizationRequest::matches_state`] before calling this.
    #[instrument(skip(self, code, code_verifier), fields(client_id = %self.config.client_id))]
    pub async fn exchange_code_for_tokens(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenPair> {
        let url = self.config.token_url();
        let params = [
            ("grant_type", GRANT_TYPE_AUTHORIZATION_CODE),
            ("client_id", self.config.client_id.as_str()),
            ("code", code),
            ("code_verifier", code_verifier),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let (status, body) = post_form(&self.http_client, &url, &params).await?;
        if !status.is_success() {
            return Err(rejected("Code exchange", status, &body, &url, "code_exchange_failed"));
        }

        let tokens = parse_token_pair(&body, &url)?;
        info!("Authorization code exchanged for tokens");
        Ok(tokens)
    }

    /// Wrap tokens obtained from this flow in a refreshing provider.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the provider's HTTP client cannot be
    /// created.
    pub fn into_provider(self, tokens: TokenPair) -> Result<RefreshableTokenProvider> {
        RefreshableTokenProvider::new(tokens, self.config)
    }
}

#[cfg(test)]
mod tests {
    use deviceplat_common::auth::generate_code_challenge;
    use deviceplat_domain::ErrorKind;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(auth_base_url: &str) -> OAuthConfig {
        OAuthConfig {
            auth_base_url: auth_base_url.to_string(),
            redirect_uri: Some("http://localhost:8765/callback".into()),
            timeout_ms: 2_000,
            ..OAuthConfig::new("web-client")
        }
    }

    #[test]
    fn test_new_requires_redirect_uri() {
        let err = BrowserPkceFlow::new(OAuthConfig::new("web-client")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_auth_url_carries_pkce_parameters() {
        let flow = BrowserPkceFlow::new(config("https://login.test")).unwrap();
        let request = flow.generate_auth_url();

        let url = Url::parse(&request.url).unwrap();
        assert_eq!(url.path(), "/authorize");
        let query: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(query["response_type"], "code");
        assert_eq!(query["client_id"], "web-client");
        assert_eq!(query["redirect_uri"], "http://localhost:8765/callback");
        assert_eq!(query["scope"], "openid profile offline_access");
        assert_eq!(query["code_challenge_method"], "S256");
        assert_eq!(query["state"], request.state);
        assert_eq!(query["code_challenge"], generate_code_challenge(&request.code_verifier));
        assert!(query.contains_key("audience"));
    }

    #[test]
    fn test_each_request_is_unique() {
        let flow = BrowserPkceFlow::new(config("https://login.test")).unwrap();
        let first = flow.generate_auth_url();
        let second = flow.generate_auth_url();

        assert_ne!(first.state, second.state);
        assert_ne!(first.code_verifier, second.code_verifier);
        assert!(first.matches_state(&first.state.clone()));
        assert!(!first.matches_state(&second.state));
    }

    #[test]
    fn test_debug_hides_verifier() {
        let flow = BrowserPkceFlow::new(config("https://login.test")).unwrap();
        let request = flow.generate_auth_url();
        assert!(!format!("{request:?}").contains(&request.code_verifier));
    }

    #[tokio::test]
    async fn test_exchange_code_for_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth-code-1"))
            .and(body_string_contains("code_verifier=verifier-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "acc",
                "refresh_token": "ref",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let flow = BrowserPkceFlow::new(config(&server.uri())).unwrap();
        let pair = flow.exchange_code_for_tokens("auth-code-1", "verifier-1").await.unwrap();

        assert_eq!(pair.access_token, "acc");
        assert_eq!(pair.refresh_token.as_deref(), Some("ref"));
    }

    #[tokio::test]
    async fn test_exchange_failure_keeps_body_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({"error": "invalid_grant", "error_description": "code already used"}),
            ))
            .mount(&server)
            .await;

        let flow = BrowserPkceFlow::new(config(&server.uri())).unwrap();
        let err = flow.exchange_code_for_tokens("used", "verifier").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.to_string().contains("code already used"));
        assert_eq!(err.details().unwrap().error_type, "invalid_grant");
    }
}
