//! # Credential Offer
//!
//! Generates a pre-authorized code for an exchange and returns the Credential
//! Offer the Wallet uses to start the Pre-Authorized Code Flow. Requesting
//! the offer again replaces the code, until the code has been exchanged for
//! an access token.

use std::collections::HashMap;
use std::future::Future;

use chrono::Utc;
use tracing::instrument;

use crate::core::generate;
use crate::endpoint::Handler;
use crate::provider::{ExchangeStore, Provider};
use crate::state::{ExchangeRecord, ExchangeState};
use crate::types::{
    CredentialOffer, CredentialOfferRequest, PreAuthorizedCodeGrant, PRE_AUTHORIZED_GRANT,
};
use crate::{Error, Result};

/// Credential Offer request handler.
///
/// # Errors
///
/// Returns an `OpenID` error if the exchange does not exist or has already
/// progressed past the offer.
#[instrument(level = "debug", skip(provider))]
pub async fn credential_offer(
    credential_issuer: &str, provider: impl Provider, request: CredentialOfferRequest,
) -> Result<CredentialOffer> {
    tracing::debug!("credential_offer::process");

    let record = ExchangeStore::get(&provider, &request.exchange_id)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue getting exchange record: {e}")))?;
    let Some(record) = record else {
        return Err(Error::NotFound(format!("exchange not found: {}", request.exchange_id)));
    };
    if record.token.is_some() {
        return Err(Error::InvalidRequest("exchange has already been redeemed".into()));
    }

    let code = generate::pre_authorized_code();
    let updated = ExchangeRecord {
        state: ExchangeState::Offer,
        code: Some(code.clone()),
        updated_at: Utc::now(),
        ..record.clone()
    };
    let swapped = ExchangeStore::compare_and_swap(&provider, &record, &updated)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue saving exchange record: {e}")))?;
    if !swapped {
        return Err(Error::InvalidRequest("exchange was modified concurrently".into()));
    }

    let grant = PreAuthorizedCodeGrant {
        pre_authorized_code: code,
        user_pin_required: record.pin.is_some(),
    };

    Ok(CredentialOffer {
        credential_issuer: credential_issuer.to_string(),
        credentials: vec![record.supported_cred_id],
        grants: HashMap::from([(PRE_AUTHORIZED_GRANT.to_string(), grant)]),
    })
}

impl Handler for CredentialOfferRequest {
    type Response = CredentialOffer;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        credential_offer(credential_issuer, provider.clone(), self)
    }
}
