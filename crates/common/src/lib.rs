//! Non-networked building blocks shared across DevicePlat crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: token types and JWT expiry inspection
//! - `platform`: PKCE generation and webhook signature verification

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod webhook;

// Re-export commonly used types and functions
// ------------------------
#[cfg(feature = "foundation")]
pub use auth::{is_token_expired, DeviceAuthorization, OAuthErrorBody, TokenPair};
#[cfg(feature = "platform")]
pub use auth::PkceChallenge;
#[cfg(feature = "platform")]
pub use webhook::{construct_event, WebhookError, WebhookOptions, WebhookVerifier};
