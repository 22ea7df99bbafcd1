//! # Provider
//!
//! The library relies on implementers to supply storage for exchange records,
//! the supported credential catalog, and custody of the issuer's signing key.

use std::future::Future;

use anyhow::Result;

use crate::jose::Algorithm;
use crate::state::{ExchangeRecord, Filter};
use crate::types::SupportedCredential;

/// Issuer Provider trait.
pub trait Provider: ExchangeStore + Catalog + KeyOps + Clone {}

/// A blanket implementation for `Provider` trait so that any type implementing
/// the required super traits is considered a `Provider`.
impl<T> Provider for T where T: ExchangeStore + Catalog + KeyOps + Clone {}

/// `ExchangeStore` persists exchange records between the offer, token, and
/// credential steps.
pub trait ExchangeStore: Send + Sync {
    /// Return all records matching the filter.
    fn query(&self, filter: &Filter) -> impl Future<Output = Result<Vec<ExchangeRecord>>> + Send;

    /// Retrieve a record by its exchange id.
    fn get(&self, exchange_id: &str) -> impl Future<Output = Result<Option<ExchangeRecord>>> + Send;

    /// Insert or replace a record, keyed by its exchange id.
    fn put(&self, record: &ExchangeRecord) -> impl Future<Output = Result<()>> + Send;

    /// Replace `current` with `updated` only when the stored record is still
    /// equal to `current`. Returns `false` when the stored record has changed
    /// (or been removed) since it was read.
    fn compare_and_swap(
        &self, current: &ExchangeRecord, updated: &ExchangeRecord,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Remove a record, returning it if it existed.
    fn delete(&self, exchange_id: &str)
        -> impl Future<Output = Result<Option<ExchangeRecord>>> + Send;
}

/// The `Catalog` trait holds the credentials an issuer is able to issue.
pub trait Catalog: Send + Sync {
    /// The supported credential with the specified identifier.
    fn supported(
        &self, supported_cred_id: &str,
    ) -> impl Future<Output = Result<Option<SupportedCredential>>> + Send;

    /// All supported credentials.
    fn list(&self) -> impl Future<Output = Result<Vec<SupportedCredential>>> + Send;

    /// Add (or replace) a supported credential.
    fn add(&self, supported: &SupportedCredential) -> impl Future<Output = Result<()>> + Send;

    /// Remove a supported credential, returning it if it existed.
    fn remove(
        &self, supported_cred_id: &str,
    ) -> impl Future<Output = Result<Option<SupportedCredential>>> + Send;
}

/// `KeyOps` gives the library access to the issuer's signing identity.
pub trait KeyOps: Send + Sync {
    /// The durable signing identity for the specified credential issuer. The
    /// same identity must be returned for every call with the same issuer so
    /// that tokens minted by one request verify in the next.
    fn signer(&self, credential_issuer: &str) -> Result<impl Signer>;
}

/// Signer is used by implementers to provide signing functionality for
/// access tokens and Verifiable Credentials.
pub trait Signer: Send + Sync {
    /// Algorithm returns the algorithm used by the signer.
    fn algorithm(&self) -> Algorithm;

    /// The verification method the verifier should use to verify the signer's
    /// signature. For this library, a `did:key` DID URL.
    fn verification_method(&self) -> String;

    /// Sign the message, returning the raw signature bytes.
    fn try_sign(&self, msg: &[u8]) -> impl Future<Output = Result<Vec<u8>>> + Send;
}
