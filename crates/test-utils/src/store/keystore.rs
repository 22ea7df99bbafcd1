use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use ed25519_dalek::{SecretKey, SigningKey};
use rand::rngs::OsRng;

const HOLDER_SECRET: &str = "Y1KNbzOcX112pXI3v6sFvcr8uBLw4Pc2ciZTWdZx-As";

// Issuer signing keys, one per credential issuer. A key is generated the
// first time an issuer is seen and reused thereafter.
#[derive(Default, Clone, Debug)]
pub struct IssuerKeystore {
    keys: Arc<Mutex<HashMap<String, SigningKey>>>,
}

impl IssuerKeystore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signing_key(&self, credential_issuer: &str) -> SigningKey {
        let mut keys = self.keys.lock().expect("should lock");
        keys.entry(credential_issuer.to_string())
            .or_insert_with(|| SigningKey::generate(&mut OsRng))
            .clone()
    }
}

pub struct HolderKeystore;

impl HolderKeystore {
    pub fn signing_key() -> Result<SigningKey> {
        let decoded = Base64UrlUnpadded::decode_vec(HOLDER_SECRET)?;
        let secret_key: SecretKey =
            decoded.try_into().map_err(|_| anyhow!("invalid secret key"))?;
        Ok(SigningKey::from_bytes(&secret_key))
    }
}
