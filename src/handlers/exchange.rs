//! # Exchange Records
//!
//! Administrative operations used by the issuer to prepare exchanges before
//! offering them to a Wallet, and to inspect or discard them afterwards.

use std::future::Future;

use tracing::instrument;

use crate::endpoint::Handler;
use crate::provider::{Catalog, ExchangeStore, Provider};
use crate::state::{ExchangeRecord, Filter};
use crate::types::{
    CreateExchangeRequest, ListExchangesRequest, ListResponse, RemoveExchangeRequest,
};
use crate::{Error, Result};

/// Create an exchange record holding the claims to be issued.
///
/// # Errors
///
/// Returns an `OpenID` error if the supported credential is unknown or the
/// subject carries claims it does not declare.
#[instrument(level = "debug", skip(provider))]
pub async fn create(
    credential_issuer: &str, provider: impl Provider, request: CreateExchangeRequest,
) -> Result<ExchangeRecord> {
    tracing::debug!("exchange::create");

    if request.supported_cred_id.is_empty() {
        return Err(Error::InvalidRequest("`supported_cred_id` is missing".into()));
    }
    let supported = Catalog::supported(&provider, &request.supported_cred_id)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue getting supported credential: {e}")))?;
    let Some(supported) = supported else {
        return Err(Error::NotFound(format!(
            "supported credential not found: {}",
            request.supported_cred_id
        )));
    };

    let declared = &supported.format_data.credential_subject;
    if !declared.is_empty() {
        if let Some(key) = request.credential_subject.keys().find(|k| !declared.contains_key(*k)) {
            return Err(Error::InvalidRequest(format!("undeclared subject claim: {key}")));
        }
    }

    let record =
        ExchangeRecord::new(request.supported_cred_id, request.credential_subject, request.pin);
    ExchangeStore::put(&provider, &record)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue saving exchange record: {e}")))?;

    Ok(record)
}

/// List exchange records matching the request criteria.
///
/// # Errors
///
/// Returns an `OpenID` error if the store is not available.
#[instrument(level = "debug", skip(provider))]
pub async fn list(
    credential_issuer: &str, provider: impl Provider, request: ListExchangesRequest,
) -> Result<ListResponse<ExchangeRecord>> {
    tracing::debug!("exchange::list");

    let filter = Filter::Exchange {
        supported_cred_id: request.supported_cred_id,
        state: request.state,
    };
    let results = ExchangeStore::query(&provider, &filter)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue querying exchange records: {e}")))?;

    Ok(ListResponse { results })
}

/// Remove an exchange record.
///
/// # Errors
///
/// Returns an `OpenID` error if the record does not exist.
#[instrument(level = "debug", skip(provider))]
pub async fn remove(
    credential_issuer: &str, provider: impl Provider, request: RemoveExchangeRequest,
) -> Result<ExchangeRecord> {
    tracing::debug!("exchange::remove");

    let removed = ExchangeStore::delete(&provider, &request.exchange_id)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue removing exchange record: {e}")))?;
    removed.ok_or_else(|| Error::NotFound(format!("exchange not found: {}", request.exchange_id)))
}

impl Handler for CreateExchangeRequest {
    type Response = ExchangeRecord;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        create(credential_issuer, provider.clone(), self)
    }
}

impl Handler for ListExchangesRequest {
    type Response = ListResponse<ExchangeRecord>;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        list(credential_issuer, provider.clone(), self)
    }
}

impl Handler for RemoveExchangeRequest {
    type Response = ExchangeRecord;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        remove(credential_issuer, provider.clone(), self)
    }
}
