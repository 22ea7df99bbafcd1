//! # Proof Validator
//!
//! Validates the Wallet's proof of possession. The proof JWT is verified
//! against the key named by its own `kid` before any claim is read, so a
//! successful validation binds the `c_nonce` to the holder key.

use crate::did;
use crate::jose::{jws, Type};
use crate::types::{Proof, ProofClaims};
use crate::{Error, Result};

/// Validate the proof against the expected `c_nonce`, returning the holder's
/// key identifier (the proof's `kid`).
///
/// # Errors
///
/// Returns [`Error::InvalidProof`] when the proof type is not `jwt`, the JWT
/// cannot be decoded, its signature does not verify, or its `typ` is wrong.
/// Returns [`Error::Forbidden`] when the proof is bound to a different nonce.
pub fn validate(proof: &Proof, expected_nonce: &str) -> Result<String> {
    tracing::debug!("proof::validate");

    if proof.proof_type != "jwt" {
        return Err(Error::InvalidProof(format!("unsupported proof type: {}", proof.proof_type)));
    }

    let jwt = jws::decode::<_, ProofClaims>(&proof.jwt, did::resolve_key)
        .map_err(|e| Error::InvalidProof(format!("issue decoding proof: {e}")))?;

    if jwt.header.typ != Type::Proof.to_string() {
        return Err(Error::InvalidProof(format!("invalid proof `typ`: {}", jwt.header.typ)));
    }
    if jwt.claims.nonce.as_deref() != Some(expected_nonce) {
        return Err(Error::Forbidden("invalid proof: wrong nonce".into()));
    }

    Ok(jwt.header.kid)
}
