//! # DevicePlat Infrastructure
//!
//! Networked half of the SDK.
//!
//! This crate contains:
//! - The HTTP transport and the retrying API request pipeline
//! - Access token providers and the OAuth flows that feed them
//! - Typed façades over the platform's REST resources
//! - Configuration loading from the environment or a config file
//!
//! ## Architecture
//! - Payload types, config structs and the error taxonomy live in
//!   `deviceplat-domain`
//! - Token expiry, PKCE and webhook verification live in
//!   `deviceplat-common`; the webhook verifier is re-exported here

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod oauth;
pub mod resources;

pub use api::{ApiClient, ApiClientBuilder, RequestBody, RequestOptions};
pub use auth::{AccessTokenProvider, RefreshableTokenProvider, StaticTokenProvider};
pub use deviceplat_common::webhook::{construct_event, WebhookOptions, WebhookVerifier};
pub use deviceplat_domain::{
    ApiClientConfig, DevicePlatError, ErrorDetails, ErrorKind, OAuthConfig, Result, SdkConfig,
};
pub use http::{HttpClient, HttpClientBuilder};
pub use oauth::{refresh_access_token, AuthorizationRequest, BrowserPkceFlow, DeviceCodeFlow};
pub use resources::{ContentApi, DevicePlatClient, DevicesApi, FamilyApi, MediaApi};
