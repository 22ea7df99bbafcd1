//! Wallet (holder) keys used to sign proofs of possession.

use anyhow::Result;
use chrono::Utc;
use ed25519_dalek::{Signer as _, SigningKey};
use rand::rngs::OsRng;
use vercre_exchange::jose::{jws, Algorithm, Type};
use vercre_exchange::provider::Signer;
use vercre_exchange::{did, Proof, ProofClaims};

use crate::store::keystore::HolderKeystore;

/// A holder's `did:key` identity. The verification method is the bare DID.
#[derive(Clone, Debug)]
pub struct Keyring {
    signing_key: SigningKey,
}

impl Keyring {
    /// The well-known test holder.
    ///
    /// # Panics
    ///
    /// Panics if the holder's secret key is malformed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            signing_key: HolderKeystore::signing_key().expect("should decode holder key"),
        }
    }

    /// A holder with a freshly generated key.
    #[must_use]
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// The holder's DID.
    #[must_use]
    pub fn did(&self) -> String {
        did::did_key(&self.signing_key.verifying_key())
    }

    /// Create a proof of possession bound to `nonce`.
    ///
    /// # Errors
    ///
    /// Returns an error if the proof cannot be signed.
    pub async fn proof(&self, credential_issuer: &str, nonce: &str) -> Result<Proof> {
        let claims = ProofClaims {
            iss: None,
            aud: Some(credential_issuer.to_string()),
            iat: Utc::now().timestamp(),
            nonce: Some(nonce.to_string()),
        };
        let jwt = jws::encode(Type::Proof, &claims, self).await?;

        Ok(Proof {
            proof_type: "jwt".into(),
            jwt,
        })
    }
}

impl Default for Keyring {
    fn default() -> Self {
        Self::new()
    }
}

impl Signer for Keyring {
    fn algorithm(&self) -> Algorithm {
        Algorithm::EdDSA
    }

    fn verification_method(&self) -> String {
        self.did()
    }

    async fn try_sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signing_key.sign(msg).to_bytes().to_vec())
    }
}
