//! # DID Key
//!
//! The `did:key` method is a DID method for static cryptographic keys. The
//! method-specific identifier is the multibase (base58btc) encoding of the
//! multicodec-prefixed public key, so a verification key can be recovered
//! from the identifier alone.
//!
//! See <https://w3c-ccg.github.io/did-method-key>

use anyhow::{anyhow, bail};
use ed25519_dalek::VerifyingKey;
use multibase::Base;

const ED25519_CODEC: [u8; 2] = [0xed, 0x01];
const DID_KEY_PREFIX: &str = "did:key:";

/// Create a `did:key` DID for the Ed25519 verifying key.
#[must_use]
pub fn did_key(verifying_key: &VerifyingKey) -> String {
    format!("{DID_KEY_PREFIX}{}", multikey(verifying_key))
}

/// Create a DID URL identifying the verification method of the `did:key`
/// DID for the Ed25519 verifying key. That is, `did:key:z6Mk...#z6Mk...`.
#[must_use]
pub fn verification_method(verifying_key: &VerifyingKey) -> String {
    let multikey = multikey(verifying_key);
    format!("{DID_KEY_PREFIX}{multikey}#{multikey}")
}

/// Strip any fragment from a DID URL, returning the DID.
#[must_use]
pub fn did_from_url(did_url: &str) -> &str {
    did_url.split('#').next().unwrap_or(did_url)
}

/// Resolve a `did:key` DID or DID URL to its Ed25519 verifying key.
///
/// # Errors
///
/// Returns an error if the identifier is not a well-formed Ed25519 `did:key`
/// or the fragment, when present, names a different key.
pub fn resolve_key(did_url: &str) -> anyhow::Result<VerifyingKey> {
    let (did, fragment) = match did_url.split_once('#') {
        Some((did, fragment)) => (did, Some(fragment)),
        None => (did_url, None),
    };

    let Some(identifier) = did.strip_prefix(DID_KEY_PREFIX) else {
        bail!("DID is not a valid did:key");
    };
    if !identifier.starts_with('z') {
        bail!("did:key identifier is not base58btc encoded");
    }
    if let Some(fragment) = fragment {
        if fragment != identifier {
            bail!("DID URL fragment does not reference the did:key");
        }
    }

    let (_, key_bytes) =
        multibase::decode(identifier).map_err(|e| anyhow!("issue decoding key: {e}"))?;
    if key_bytes.len() != ED25519_CODEC.len() + 32 {
        bail!("invalid key length");
    }
    if key_bytes[0..2] != ED25519_CODEC {
        bail!("unsupported key type");
    }

    let bytes: [u8; 32] =
        key_bytes[2..].try_into().map_err(|_| anyhow!("invalid public key length"))?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| anyhow!("unable to build verifying key: {e}"))
}

fn multikey(verifying_key: &VerifyingKey) -> String {
    let mut multi_bytes = vec![];
    multi_bytes.extend_from_slice(&ED25519_CODEC);
    multi_bytes.extend_from_slice(verifying_key.as_bytes());
    multibase::encode(Base::Base58Btc, &multi_bytes)
}
