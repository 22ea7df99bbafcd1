//! Issuer provider with injectable faults.
//!
//! Wraps [`ProviderImpl`] so tests can take the store or the keystore offline,
//! or serve stale query results to reproduce a request that read a record
//! just before a concurrent request updated it.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use vercre_exchange::provider::{Catalog, ExchangeStore, KeyOps, Signer};
use vercre_exchange::state::{ExchangeRecord, Filter};
use vercre_exchange::SupportedCredential;

use crate::issuer::ProviderImpl;

/// Issuer provider whose store and keystore can be made to misbehave.
#[derive(Default, Clone, Debug)]
pub struct FaultyProvider {
    inner: ProviderImpl,
    store_offline: Arc<AtomicBool>,
    signer_offline: Arc<AtomicBool>,
    snapshot: Arc<Mutex<Option<Vec<ExchangeRecord>>>>,
    lost_swaps: Arc<AtomicUsize>,
}

impl FaultyProvider {
    /// Wrap a provider. No faults are active.
    #[must_use]
    pub fn new(inner: ProviderImpl) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Fail every exchange store operation.
    pub fn store_offline(&self) {
        self.store_offline.store(true, Ordering::SeqCst);
    }

    /// Fail every request for a signer.
    pub fn signer_offline(&self) {
        self.signer_offline.store(true, Ordering::SeqCst);
    }

    /// Capture the current exchange records. Until [`Self::thaw`] is called,
    /// queries are answered from the capture while writes reach the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn freeze(&self) -> Result<()> {
        let all = Filter::Exchange {
            supported_cred_id: None,
            state: None,
        };
        let records = ExchangeStore::query(&self.inner, &all).await?;
        *self.snapshot.lock().expect("should lock") = Some(records);
        Ok(())
    }

    /// Answer queries from the store again.
    pub fn thaw(&self) {
        *self.snapshot.lock().expect("should lock") = None;
    }

    /// Number of `compare_and_swap` calls that found the record changed.
    #[must_use]
    pub fn lost_swaps(&self) -> usize {
        self.lost_swaps.load(Ordering::SeqCst)
    }

    fn check_store(&self) -> Result<()> {
        if self.store_offline.load(Ordering::SeqCst) {
            bail!("exchange store offline");
        }
        Ok(())
    }
}

impl ExchangeStore for FaultyProvider {
    async fn query(&self, filter: &Filter) -> Result<Vec<ExchangeRecord>> {
        self.check_store()?;
        let frozen = self.snapshot.lock().expect("should lock").clone();
        if let Some(records) = frozen {
            return Ok(records.into_iter().filter(|r| filter.matches(r)).collect());
        }
        ExchangeStore::query(&self.inner, filter).await
    }

    async fn get(&self, exchange_id: &str) -> Result<Option<ExchangeRecord>> {
        self.check_store()?;
        ExchangeStore::get(&self.inner, exchange_id).await
    }

    async fn put(&self, record: &ExchangeRecord) -> Result<()> {
        self.check_store()?;
        ExchangeStore::put(&self.inner, record).await
    }

    async fn compare_and_swap(
        &self, current: &ExchangeRecord, updated: &ExchangeRecord,
    ) -> Result<bool> {
        self.check_store()?;
        let swapped = ExchangeStore::compare_and_swap(&self.inner, current, updated).await?;
        if !swapped {
            self.lost_swaps.fetch_add(1, Ordering::SeqCst);
        }
        Ok(swapped)
    }

    async fn delete(&self, exchange_id: &str) -> Result<Option<ExchangeRecord>> {
        self.check_store()?;
        ExchangeStore::delete(&self.inner, exchange_id).await
    }
}

impl Catalog for FaultyProvider {
    async fn supported(&self, supported_cred_id: &str) -> Result<Option<SupportedCredential>> {
        Catalog::supported(&self.inner, supported_cred_id).await
    }

    async fn list(&self) -> Result<Vec<SupportedCredential>> {
        Catalog::list(&self.inner).await
    }

    async fn add(&self, supported: &SupportedCredential) -> Result<()> {
        Catalog::add(&self.inner, supported).await
    }

    async fn remove(&self, supported_cred_id: &str) -> Result<Option<SupportedCredential>> {
        Catalog::remove(&self.inner, supported_cred_id).await
    }
}

impl KeyOps for FaultyProvider {
    fn signer(&self, credential_issuer: &str) -> Result<impl Signer> {
        if self.signer_offline.load(Ordering::SeqCst) {
            bail!("keystore offline");
        }
        KeyOps::signer(&self.inner, credential_issuer)
    }
}
