//! # Supported Credentials
//!
//! Catalog management: the credentials the issuer is able to issue.

use std::future::Future;

use tracing::instrument;

use crate::endpoint::Handler;
use crate::provider::{Catalog, Provider};
use crate::types::{
    CreateSupportedRequest, ListResponse, ListSupportedRequest, RemoveSupportedRequest,
    SupportedCredential, JWT_VC_JSON,
};
use crate::{Error, Result};

/// Add a supported credential to the catalog.
///
/// # Errors
///
/// Returns an `OpenID` error if the credential is incomplete or not in the
/// `jwt_vc_json` format.
#[instrument(level = "debug", skip(provider))]
pub async fn create(
    credential_issuer: &str, provider: impl Provider, request: CreateSupportedRequest,
) -> Result<SupportedCredential> {
    tracing::debug!("supported::create");

    let supported = request.supported;
    if supported.identifier.is_empty() {
        return Err(Error::InvalidRequest("`id` is missing".into()));
    }
    if supported.format != JWT_VC_JSON {
        return Err(Error::UnsupportedFormat(format!(
            "unsupported credential format: {}",
            supported.format
        )));
    }
    if supported.format_data.types.is_empty() {
        return Err(Error::InvalidRequest("`format_data.types` is empty".into()));
    }

    Catalog::add(&provider, &supported)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue saving supported credential: {e}")))?;

    Ok(supported)
}

/// List the catalog.
///
/// # Errors
///
/// Returns an `OpenID` error if the catalog is not available.
#[instrument(level = "debug", skip(provider))]
pub async fn list(
    credential_issuer: &str, provider: impl Provider, _request: ListSupportedRequest,
) -> Result<ListResponse<SupportedCredential>> {
    tracing::debug!("supported::list");

    let results = Catalog::list(&provider)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue listing supported credentials: {e}")))?;
    Ok(ListResponse { results })
}

/// Remove a supported credential from the catalog.
///
/// # Errors
///
/// Returns an `OpenID` error if the credential does not exist.
#[instrument(level = "debug", skip(provider))]
pub async fn remove(
    credential_issuer: &str, provider: impl Provider, request: RemoveSupportedRequest,
) -> Result<SupportedCredential> {
    tracing::debug!("supported::remove");

    let removed = Catalog::remove(&provider, &request.supported_cred_id)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue removing supported credential: {e}")))?;
    removed.ok_or_else(|| {
        Error::NotFound(format!("supported credential not found: {}", request.supported_cred_id))
    })
}

impl Handler for CreateSupportedRequest {
    type Response = SupportedCredential;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        create(credential_issuer, provider.clone(), self)
    }
}

impl Handler for ListSupportedRequest {
    type Response = ListResponse<SupportedCredential>;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        list(credential_issuer, provider.clone(), self)
    }
}

impl Handler for RemoveSupportedRequest {
    type Response = SupportedCredential;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        remove(credential_issuer, provider.clone(), self)
    }
}
