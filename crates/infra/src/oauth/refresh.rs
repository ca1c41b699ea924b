use deviceplat_common::auth::TokenPair;
use deviceplat_domain::constants::GRANT_TYPE_REFRESH_TOKEN;
use deviceplat_domain::{OAuthConfig, Result};
use tracing::{debug, instrument};

use super::{oauth_http_client, parse_token_pair, post_form, rejected};
use crate::http::HttpClient;

/// Exchange a refresh token for a new token pair.
///
/// # Errors
///
/// - `Authentication` when the server rejects the refresh token or returns
///   a body that is not a token response
/// - `Connection` when the authorization server cannot be reached
#[instrument(skip(config, refresh_token), fields(auth_base_url = %config.auth_base_url))]
pub async fn refresh_access_token(config: &OAuthConfig, refresh_token: &str) -> Result<TokenPair> {
    let http_client = oauth_http_client(config)?;
    refresh_with(&http_client, config, refresh_token).await
}

pub(crate) async fn refresh_with(
    http_client: &HttpClient,
    config: &OAuthConfig,
    refresh_token: &str,
) -> Result<TokenPair> {
    let url = config.token_url();
    let params = [
        ("grant_type", GRANT_TYPE_REFRESH_TOKEN),
        ("client_id", config.client_id.as_str()),
        ("refresh_token", refresh_token),
    ];

    debug!("Requesting token refresh");
    let (status, body) = post_form(http_client, &url, &params).await?;

    if !status.is_success() {
        return Err(rejected("Token refresh", status, &body, &url, "token_refresh_failed"));
    }

    parse_token_pair(&body, &url)
}
