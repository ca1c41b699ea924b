use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deviceplat_common::auth::{expires_at, TokenPair};
use deviceplat_domain::{DevicePlatError, ErrorDetails, OAuthConfig, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::provider::AccessTokenProvider;
use crate::http::HttpClient;
use crate::oauth::refresh::refresh_with;

/// Invoked with the new pair after every successful refresh.
pub type RefreshCallback = Arc<dyn Fn(&TokenPair) + Send + Sync>;

/// Provider that refreshes the access token through the OAuth token
/// endpoint once it is within the expiry safety margin.
///
/// The pair lives behind an async mutex held across the expiry check and
/// the refresh, so concurrent callers trigger a single refresh and then
/// observe the new token.
pub struct RefreshableTokenProvider {
    tokens: Mutex<TokenPair>,
    config: OAuthConfig,
    http_client: HttpClient,
    on_refresh: Option<RefreshCallback>,
}

impl RefreshableTokenProvider {
    /// Create a provider from an initial pair.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the HTTP client cannot be created.
    pub fn new(tokens: TokenPair, config: OAuthConfig) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(config.timeout()).build()?;
        Ok(Self { tokens: Mutex::new(tokens), config, http_client, on_refresh: None })
    }

    /// Register a callback, e.g. to persist refreshed tokens.
    pub fn on_refresh(mut self, callback: impl Fn(&TokenPair) + Send + Sync + 'static) -> Self {
        self.on_refresh = Some(Arc::new(callback));
        self
    }

    /// Snapshot of the current pair.
    pub async fn token_pair(&self) -> TokenPair {
        self.tokens.lock().await.clone()
    }

    /// Expiry read from the current access token's `exp` claim, `None` for
    /// opaque tokens.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        expires_at(&self.tokens.lock().await.access_token)
    }

    /// Replace the stored pair, e.g. after an interactive re-login.
    pub async fn set_token_pair(&self, tokens: TokenPair) {
        *self.tokens.lock().await = tokens;
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }
}

impl std::fmt::Debug for RefreshableTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshableTokenProvider")
            .field("auth_base_url", &self.config.auth_base_url)
            .field("client_id", &self.config.client_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AccessTokenProvider for RefreshableTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut tokens = self.tokens.lock().await;

        if !tokens.is_expired() {
            return Ok(tokens.access_token.clone());
        }

        let refresh_token = tokens.refresh_token.clone().ok_or_else(|| {
            warn!("Access token expired and no refresh token is available");
            DevicePlatError::authentication(
                "access token expired and no refresh token is available",
                ErrorDetails::new("missing_refresh_token"),
            )
        })?;

        info!("Access token expired or expiring soon, refreshing");
        let mut refreshed = refresh_with(&self.http_client, &self.config, &refresh_token).await?;

        if refreshed.refresh_token.is_none() {
            debug!("Token endpoint did not rotate the refresh token, keeping the previous one");
            refreshed.refresh_token = Some(refresh_token);
        }

        if let Some(callback) = &self.on_refresh {
            callback(&refreshed);
        }

        let access_token = refreshed.access_token.clone();
        *tokens = refreshed;
        match expires_at(&access_token) {
            Some(expiry) => info!(expires_at = %expiry, "Access token refreshed"),
            None => info!("Access token refreshed"),
        }

        Ok(access_token)
    }
}
