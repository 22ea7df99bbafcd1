//! # JSON Web Signature (JWS)
//!
//! JWS ([RFC7515]) represents content secured with digital signatures using
//! JSON-based data structures. Cryptographic algorithms and identifiers for
//! use with this specification are described in the JWA ([RFC7518])
//! specification.
//!
//! [RFC7515]: https://www.rfc-editor.org/rfc/rfc7515
//! [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518

use std::fmt::{self, Display};

use anyhow::{anyhow, bail};
use base64ct::{Base64UrlUnpadded, Encoding};
use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::provider::Signer;

/// Represents a decoded JWT.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Jwt<T> {
    /// The JWT header.
    pub header: Header,

    /// The JWT claims.
    pub claims: T,
}

/// Represents the JWT header.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Header {
    /// Digital signature algorithm identifier as per IANA "JSON Web Signature
    /// and Encryption Algorithms" registry.
    pub alg: Algorithm,

    /// Used to declare the media type of the JWS.
    #[serde(default)]
    pub typ: String,

    /// Contains the key ID. For this library, always a `did:key` DID or DID
    /// URL identifying the signing key.
    #[serde(default)]
    pub kid: String,
}

/// Supported signing algorithms.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Algorithm {
    /// Edwards-curve Digital Signature Algorithm using Ed25519.
    #[default]
    EdDSA,
}

/// The JWT `typ` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// Plain JWT, used for access tokens and `jwt_vc_json` credentials.
    Jwt,

    /// JWT `typ` for Wallet's proof of possession of key material.
    Proof,
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt => write!(f, "JWT"),
            Self::Proof => write!(f, "openid4vci-proof+jwt"),
        }
    }
}

/// Encode the provided claims and sign, returning a JWT in compact JWS form.
///
/// # Errors
///
/// Returns an error if the header or claims cannot be serialized, or if the
/// signer fails to sign.
pub async fn encode<T>(typ: Type, claims: &T, signer: &impl Signer) -> anyhow::Result<String>
where
    T: Serialize + Send + Sync,
{
    tracing::debug!("jws::encode");

    let header = Header {
        alg: signer.algorithm(),
        typ: typ.to_string(),
        kid: signer.verification_method(),
    };

    let header = Base64UrlUnpadded::encode_string(&serde_json::to_vec(&header)?);
    let claims = Base64UrlUnpadded::encode_string(&serde_json::to_vec(claims)?);
    let payload = format!("{header}.{claims}");

    let sig = signer.try_sign(payload.as_bytes()).await?;
    let sig_enc = Base64UrlUnpadded::encode_string(&sig);

    Ok(format!("{payload}.{sig_enc}"))
}

/// Decode the JWT header without verifying the signature.
///
/// Only suitable for routing decisions (e.g. deciding which key to verify
/// with). Claims must never be trusted on the strength of this call.
///
/// # Errors
///
/// Returns an error if the token is not in compact JWS form or the header
/// cannot be deserialized.
pub fn decode_header(token: &str) -> anyhow::Result<Header> {
    let parts = split(token)?;
    let decoded = Base64UrlUnpadded::decode_vec(parts[0])
        .map_err(|e| anyhow!("issue decoding header: {e}"))?;
    serde_json::from_slice(&decoded).map_err(|e| anyhow!("issue deserializing header: {e}"))
}

/// Decode the JWT, verifying its signature with the key returned by
/// `resolve` for the header's `kid`, and return the header and claims.
///
/// # Errors
///
/// Returns an error if the token is malformed, the `kid` cannot be resolved,
/// or the signature does not verify.
pub fn decode<F, T>(token: &str, resolve: F) -> anyhow::Result<Jwt<T>>
where
    T: DeserializeOwned,
    F: FnOnce(&str) -> anyhow::Result<VerifyingKey>,
{
    let parts = split(token)?;

    let header = decode_header(token)?;
    if header.alg != Algorithm::EdDSA {
        bail!("'alg' is not recognised");
    }
    if header.kid.is_empty() {
        bail!("'kid' is not set");
    }

    // verify before trusting any claim
    let sig = Base64UrlUnpadded::decode_vec(parts[2])
        .map_err(|e| anyhow!("issue decoding signature: {e}"))?;
    let verifying_key = resolve(&header.kid)?;
    verify(&verifying_key, &format!("{}.{}", parts[0], parts[1]), &sig)?;

    let decoded = Base64UrlUnpadded::decode_vec(parts[1])
        .map_err(|e| anyhow!("issue decoding claims: {e}"))?;
    let claims =
        serde_json::from_slice(&decoded).map_err(|e| anyhow!("issue deserializing claims: {e}"))?;

    Ok(Jwt { header, claims })
}

/// Verify the signature of the provided message using the Ed25519 key.
///
/// # Errors
///
/// Returns an error if the signature is malformed or invalid.
pub fn verify(verifying_key: &VerifyingKey, msg: &str, sig: &[u8]) -> anyhow::Result<()> {
    let signature =
        Signature::from_slice(sig).map_err(|e| anyhow!("unable to build signature: {e}"))?;
    verifying_key
        .verify(msg.as_bytes(), &signature)
        .map_err(|e| anyhow!("unable to verify signature: {e}"))
}

fn split(token: &str) -> anyhow::Result<Vec<&str>> {
    let parts = token.split('.').collect::<Vec<&str>>();
    if parts.len() != 3 {
        bail!("invalid Compact JWS format");
    }
    Ok(parts)
}
