//! In-memory issuer provider.

use anyhow::Result;
use ed25519_dalek::{Signer as _, SigningKey};
use vercre_exchange::jose::Algorithm;
use vercre_exchange::provider::{Catalog, ExchangeStore, KeyOps, Signer};
use vercre_exchange::state::{ExchangeRecord, Filter};
use vercre_exchange::{did, SupportedCredential};

use crate::store::catalog::CatalogStore;
use crate::store::exchange;
use crate::store::keystore::IssuerKeystore;

pub const CREDENTIAL_ISSUER: &str = "http://vercre.io";
pub const SUPPORTED_CRED_ID: &str = "UniversityDegreeCredential";

/// Issuer provider backed by in-memory stores. Clones share the same stores.
#[derive(Default, Clone, Debug)]
pub struct ProviderImpl {
    exchange: exchange::ExchangeStore,
    catalog: CatalogStore,
    keystore: IssuerKeystore,
}

impl ProviderImpl {
    /// Create a provider with an empty exchange store and a catalog holding
    /// the `UniversityDegreeCredential`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exchange: exchange::ExchangeStore::new(),
            catalog: CatalogStore::new(),
            keystore: IssuerKeystore::new(),
        }
    }
}

impl ExchangeStore for ProviderImpl {
    async fn query(&self, filter: &Filter) -> Result<Vec<ExchangeRecord>> {
        self.exchange.query(filter)
    }

    async fn get(&self, exchange_id: &str) -> Result<Option<ExchangeRecord>> {
        self.exchange.get(exchange_id)
    }

    async fn put(&self, record: &ExchangeRecord) -> Result<()> {
        self.exchange.put(record)
    }

    async fn compare_and_swap(
        &self, current: &ExchangeRecord, updated: &ExchangeRecord,
    ) -> Result<bool> {
        self.exchange.compare_and_swap(current, updated)
    }

    async fn delete(&self, exchange_id: &str) -> Result<Option<ExchangeRecord>> {
        self.exchange.delete(exchange_id)
    }
}

impl Catalog for ProviderImpl {
    async fn supported(&self, supported_cred_id: &str) -> Result<Option<SupportedCredential>> {
        self.catalog.get(supported_cred_id)
    }

    async fn list(&self) -> Result<Vec<SupportedCredential>> {
        self.catalog.list()
    }

    async fn add(&self, supported: &SupportedCredential) -> Result<()> {
        self.catalog.add(supported)
    }

    async fn remove(&self, supported_cred_id: &str) -> Result<Option<SupportedCredential>> {
        self.catalog.remove(supported_cred_id)
    }
}

impl KeyOps for ProviderImpl {
    fn signer(&self, credential_issuer: &str) -> Result<impl Signer> {
        Ok(IssuerSigner {
            signing_key: self.keystore.signing_key(credential_issuer),
        })
    }
}

/// The issuer's signing identity. Its verification method is a `did:key`
/// DID URL.
#[derive(Clone, Debug)]
pub struct IssuerSigner {
    signing_key: SigningKey,
}

impl Signer for IssuerSigner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::EdDSA
    }

    fn verification_method(&self) -> String {
        did::verification_method(&self.signing_key.verifying_key())
    }

    async fn try_sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signing_key.sign(msg).to_bytes().to_vec())
    }
}
