//! # Metadata Endpoint
//!
//! Publishes the Credential Issuer's metadata: its identifier, Credential
//! Endpoint and the credentials it is able to issue.

use std::future::Future;

use tracing::instrument;

use crate::endpoint::Handler;
use crate::provider::{Catalog, Provider};
use crate::types::{MetadataRequest, MetadataResponse};
use crate::{Error, Result};

// Credential Endpoint path, relative to the Credential Issuer.
const CREDENTIAL_PATH: &str = "/draft-13/credential";

/// Metadata request handler.
///
/// # Errors
///
/// Returns an `OpenID` error if the catalog is not available.
#[instrument(level = "debug", skip(provider))]
pub async fn metadata(
    credential_issuer: &str, provider: impl Provider, _request: MetadataRequest,
) -> Result<MetadataResponse> {
    tracing::debug!("metadata::process");

    let supported = Catalog::list(&provider)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue listing supported credentials: {e}")))?;

    let base = credential_issuer.trim_end_matches('/');
    Ok(MetadataResponse {
        credential_issuer: credential_issuer.to_string(),
        credential_endpoint: format!("{base}{CREDENTIAL_PATH}"),
        credentials_supported: supported.iter().map(|s| s.to_issuer_metadata()).collect(),
    })
}

impl Handler for MetadataRequest {
    type Response = MetadataResponse;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        metadata(credential_issuer, provider.clone(), self)
    }
}
