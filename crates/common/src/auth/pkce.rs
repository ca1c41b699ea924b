//! PKCE (Proof Key for Code Exchange) implementation for OAuth 2.0
//!
//! Implements RFC 7636 for the browser login flow, where the SDK runs on
//! the user's machine and cannot hold a client secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of generated code verifiers (the RFC 7636 maximum).
pub const CODE_VERIFIER_LENGTH: usize = 128;

/// RFC 7636 unreserved characters.
const VERIFIER_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Generate a cryptographically secure code verifier
///
/// Returns 128 characters drawn from the RFC 7636 unreserved alphabet using
/// the thread-local CSPRNG.
#[must_use]
pub fn generate_code_verifier() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_VERIFIER_LENGTH)
        .map(|_| char::from(VERIFIER_ALPHABET[rng.gen_range(0..VERIFIER_ALPHABET.len())]))
        .collect()
}

/// Generate code challenge from verifier using SHA256
///
/// Per RFC 7636, the challenge is BASE64URL(SHA256(ASCII(code_verifier)))
#[must_use]
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generate a random state token for CSRF protection
///
/// Returns a URL-safe base64-encoded random string of 32 bytes (43 characters).
#[must_use]
pub fn generate_state() -> String {
    let random_bytes: [u8; 32] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// PKCE challenge pair for OAuth 2.0 authorization
///
/// The verifier is kept locally until the token exchange; the challenge and
/// state travel in the authorization URL.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// Random 128-character secret sent during token exchange
    pub code_verifier: String,

    /// BASE64URL(SHA256(code_verifier)) sent in the authorization request
    pub code_challenge: String,

    /// Random CSRF protection token
    pub state: String,
}

impl PkceChallenge {
    /// Generate a new challenge with fresh random verifier and state.
    ///
    /// # Examples
    /// ```
    /// use deviceplat_common::auth::pkce::PkceChallenge;
    ///
    /// let challenge = PkceChallenge::generate();
    /// assert_eq!(challenge.code_verifier.len(), 128);
    /// assert_eq!(challenge.challenge_method(), "S256");
    /// ```
    #[must_use]
    pub fn generate() -> Self {
        let code_verifier = generate_code_verifier();
        let code_challenge = generate_code_challenge(&code_verifier);
        let state = generate_state();

        Self { code_verifier, code_challenge, state }
    }

    /// Get the challenge method (always "S256" for SHA256)
    #[must_use]
    pub fn challenge_method(&self) -> &'static str {
        "S256"
    }
}
