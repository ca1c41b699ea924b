//! OAuth 2.0 building blocks
//!
//! Pure helpers used by the networked OAuth flows in `deviceplat-infra`.
//! Nothing in this module performs I/O.
//!
//! # Module Organization
//!
//! - **[`types`]**: Token pair and OAuth response shapes
//! - **[`jwt`]**: Access token expiry inspection
//! - **[`pkce`]**: PKCE verifier/challenge generation (`platform` tier)
//!
//! # Expiry policy
//!
//! An access token is treated as expired when its `exp` claim falls within
//! [`jwt::EXPIRY_SAFETY_MARGIN`] of now, or when the claim cannot be read
//! at all. Callers holding a refresh token should refresh rather than send
//! a token that fails this check.

pub mod jwt;
#[cfg(feature = "platform")]
pub mod pkce;
pub mod types;

pub use jwt::{expires_at, is_token_expired, is_token_expired_at, EXPIRY_SAFETY_MARGIN};
#[cfg(feature = "platform")]
pub use pkce::{generate_code_challenge, generate_code_verifier, generate_state, PkceChallenge};
pub use types::{DeviceAuthorization, OAuthErrorBody, TokenPair};
