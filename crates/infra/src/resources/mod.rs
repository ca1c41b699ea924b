//! Typed façades over the platform's REST resources
//!
//! Each façade maps an operation to a path, verb and body on the shared
//! [`ApiClient`]; retries, authentication and error classification all come
//! from the pipeline.

mod content;
mod devices;
mod family;
mod media;

use std::sync::Arc;

pub use content::ContentApi;
use deviceplat_domain::{ApiClientConfig, Result};
pub use devices::DevicesApi;
pub use family::FamilyApi;
pub use media::MediaApi;

use crate::api::ApiClient;
use crate::auth::{AccessTokenProvider, StaticTokenProvider};

/// Entry point owning the API client and exposing the resource façades.
///
/// ```no_run
/// use deviceplat_infra::{ApiClientConfig, DevicePlatClient};
///
/// # async fn run() -> deviceplat_infra::Result<()> {
/// let client = DevicePlatClient::with_static_token(ApiClientConfig::default(), "token")?;
/// let cards = client.content().list_mine().await?;
/// println!("{} cards", cards.cards.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DevicePlatClient {
    api: ApiClient,
}

impl DevicePlatClient {
    /// # Errors
    ///
    /// Returns a `Config` error if the API client cannot be built.
    pub fn new(config: ApiClientConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        Ok(Self { api: ApiClient::new(config, auth)? })
    }

    /// Client authenticating with a fixed access token.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the API client cannot be built.
    pub fn with_static_token(config: ApiClientConfig, token: impl Into<String>) -> Result<Self> {
        Self::new(config, Arc::new(StaticTokenProvider::new(token)))
    }

    pub fn from_api_client(api: ApiClient) -> Self {
        Self { api }
    }

    /// The underlying pipeline, for endpoints without a façade.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn content(&self) -> ContentApi<'_> {
        ContentApi::new(&self.api)
    }

    pub fn devices(&self) -> DevicesApi<'_> {
        DevicesApi::new(&self.api)
    }

    pub fn media(&self) -> MediaApi<'_> {
        MediaApi::new(&self.api)
    }

    pub fn family(&self) -> FamilyApi<'_> {
        FamilyApi::new(&self.api)
    }
}

/// Percent-encode an id for use as a path segment.
fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}
