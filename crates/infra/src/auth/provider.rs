use std::sync::Arc;

use async_trait::async_trait;
use deviceplat_domain::Result;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    ///
    /// Implementations refresh as needed and must never hand out a token
    /// they know to be expired.
    async fn access_token(&self) -> Result<String>;
}

#[async_trait]
impl<P: AccessTokenProvider + ?Sized> AccessTokenProvider for Arc<P> {
    async fn access_token(&self) -> Result<String> {
        (**self).access_token().await
    }
}

/// Provider returning the same token on every call.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_returns_token() {
        let provider = StaticTokenProvider::new("abc");
        assert_eq!(provider.access_token().await.unwrap(), "abc");
        assert_eq!(provider.access_token().await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_arc_provider_delegates() {
        let provider: Arc<dyn AccessTokenProvider> = Arc::new(StaticTokenProvider::new("abc"));
        let wrapped = Arc::new(provider);
        assert_eq!(wrapped.access_token().await.unwrap(), "abc");
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", StaticTokenProvider::new("secret-token"));
        assert!(!rendered.contains("secret-token"));
    }
}
