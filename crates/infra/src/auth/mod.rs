//! Access token providers
//!
//! The API pipeline asks its provider for a token before every attempt.
//! [`StaticTokenProvider`] returns a fixed token; [`RefreshableTokenProvider`]
//! refreshes through the OAuth token endpoint once the access token is
//! within the expiry safety margin.

mod provider;
mod refreshable;

pub use provider::{AccessTokenProvider, StaticTokenProvider};
pub use refreshable::{RefreshCallback, RefreshableTokenProvider};
