//! # Generate
//!
//! Generate random strings for use as pre-authorized code, nonce, and
//! identifiers.

use base64ct::{Base64UrlUnpadded, Encoding};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

// bytes of entropy before encoding
const CODE_LEN: usize = 32;
const NONCE_LEN: usize = 32;

/// Generates a base64url encoded random string for a pre-authorized code.
#[must_use]
pub fn pre_authorized_code() -> String {
    random_string(CODE_LEN)
}

/// Generates a base64url encoded random string for `c_nonce`.
#[must_use]
pub fn nonce() -> String {
    random_string(NONCE_LEN)
}

/// Generates an exchange record identifier.
#[must_use]
pub fn exchange_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a credential identifier, used as both the credential's `id` and
/// the credential JWT's `jti`.
#[must_use]
pub fn credential_id() -> String {
    format!("urn:uuid:{}", Uuid::new_v4())
}

/// Generates a JWT ID for access tokens.
#[must_use]
pub fn token_id() -> String {
    Uuid::new_v4().to_string()
}

// Fills `len` bytes from the operating system's CSPRNG and encodes them as
// URL-safe base64 without padding.
fn random_string(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}
