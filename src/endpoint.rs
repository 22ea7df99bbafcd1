//! # Endpoint
//!
//! `Endpoint` provides the entry point for issuer requests. Requests are
//! routed to the appropriate handler for processing, returning a response
//! that can be serialized to a JSON object.

use std::fmt::Debug;
use std::future::Future;

use crate::provider::Provider;
use crate::{Error, Result};

/// Handle incoming requests.
///
/// # Errors
///
/// This method can fail for a number of reasons related to the incoming
/// request's viability. Expected failures include invalid authorization,
/// unknown or already used codes, and invalid proofs.
///
/// Implementers should look to the Error type and description for more
/// information on the reason for failure.
pub async fn handle<T>(
    credential_issuer: &str, request: impl Handler<Response = T>, provider: &impl Provider,
) -> Result<T> {
    request.validate(credential_issuer, provider).await?;
    request.handle(credential_issuer, provider).await
}

/// Methods common to all requests.
///
/// The primary role of this trait is to provide a common interface for
/// requests so they can be handled by [`handle`] method.
pub trait Handler: Clone + Debug + Send + Sync {
    /// The inner response type specific to the implementing request.
    type Response;

    /// Routes the request to the concrete handler used to process it.
    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send;

    /// Perform initial validation of the request.
    ///
    /// Validation undertaken here is common to all requests, with request-
    /// specific validation performed by the request's handler.
    fn validate(
        &self, credential_issuer: &str, _provider: &impl Provider,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            if credential_issuer.is_empty() {
                return Err(Error::InvalidRequest("no `credential_issuer` specified".into()));
            }
            Ok(())
        }
    }
}
