//! # Credential Endpoint
//!
//! The Credential Endpoint issues a Credential as approved by the End-User
//! upon presentation of a valid Access Token representing this approval.
//!
//! The Wallet proves possession of the key the Credential is to be bound to
//! by signing a JWT carrying the `c_nonce` returned with the Access Token.
//! A `c_nonce` can be used once: on success it is replaced by a fresh one,
//! returned in the response for any subsequent request.

use std::future::Future;

use chrono::Utc;
use tracing::instrument;

use crate::core::generate;
use crate::endpoint::Handler;
use crate::handlers::find_one;
use crate::provider::{Catalog, ExchangeStore, KeyOps, Provider};
use crate::state::{ExchangeRecord, ExchangeState, Expire, Filter};
use crate::types::{CredentialRequest, CredentialResponse, SupportedCredential, JWT_VC_JSON};
use crate::{assembler, auth, proof, Error, Result};

/// Credential request handler.
///
/// # Errors
///
/// Returns an `OpenID` error if the request is not authorized, the proof is
/// invalid, or the requested credential is not supported.
#[instrument(level = "debug", skip(provider))]
pub async fn credential(
    credential_issuer: &str, provider: impl Provider, request: CredentialRequest,
) -> Result<CredentialResponse> {
    let token = auth::authenticate(request.authorization.as_deref(), credential_issuer, &provider)?;

    let Some(record) = find_one(&provider, &Filter::Token(token)).await? else {
        return Err(Error::InvalidToken("no exchange found for access token".into()));
    };
    if record.token_expired() {
        return Err(Error::InvalidToken("access token has expired".into()));
    }

    let supported = Catalog::supported(&provider, &record.supported_cred_id)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue getting supported credential: {e}")))?;
    let Some(supported) = supported else {
        return Err(Error::NotFound(format!(
            "supported credential not found: {}",
            record.supported_cred_id
        )));
    };

    let ctx = Context { record, supported };
    ctx.verify(&request)?;
    ctx.process(credential_issuer, &provider, &request).await
}

impl Handler for CredentialRequest {
    type Response = CredentialResponse;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        credential(credential_issuer, provider.clone(), self)
    }
}

#[derive(Debug)]
struct Context {
    record: ExchangeRecord,
    supported: SupportedCredential,
}

impl Context {
    fn verify(&self, request: &CredentialRequest) -> Result<()> {
        tracing::debug!("credential::verify");

        if request.format != JWT_VC_JSON {
            return Err(Error::UnsupportedFormat(format!(
                "unsupported credential format: {}",
                request.format
            )));
        }
        if let Some(t) = request.types.iter().find(|t| !self.supported.format_data.types.contains(*t))
        {
            return Err(Error::UnsupportedCredentialType(format!(
                "credential type not offered: {t}"
            )));
        }

        if request.proof.is_none()
            && !self.supported.cryptographic_binding_methods_supported.is_empty()
        {
            return Err(Error::InvalidProof("proof is required".into()));
        }

        Ok(())
    }

    async fn process(
        &self, credential_issuer: &str, provider: &impl Provider, request: &CredentialRequest,
    ) -> Result<CredentialResponse> {
        tracing::debug!("credential::process");

        let mut holder_kid = None;
        let mut c_nonce = None;

        if let Some(proof) = &request.proof {
            let Some(nonce) = &self.record.nonce else {
                return Err(Error::InvalidProof("no `c_nonce` issued for access token".into()));
            };
            if self.record.nonce_expired() {
                return Err(Error::InvalidProof("`c_nonce` has expired".into()));
            }

            let kid = proof::validate(proof, nonce)?;

            // consume the nonce so the proof cannot be replayed
            let now = Utc::now();
            let fresh_nonce = generate::nonce();
            let updated = ExchangeRecord {
                state: ExchangeState::Issued,
                nonce: Some(fresh_nonce.clone()),
                nonce_expires_at: Some(now + Expire::Nonce.duration()),
                updated_at: now,
                ..self.record.clone()
            };
            let swapped = ExchangeStore::compare_and_swap(provider, &self.record, &updated)
                .await
                .map_err(|e| Error::InvalidRequest(format!("issue saving exchange record: {e}")))?;
            if !swapped {
                tracing::warn!(exchange_id = %self.record.exchange_id, "proof replayed");
                return Err(Error::InvalidProof("`c_nonce` has already been used".into()));
            }

            holder_kid = Some(kid);
            c_nonce = Some(fresh_nonce);
        } else if self.record.state != ExchangeState::Issued {
            let updated = ExchangeRecord {
                state: ExchangeState::Issued,
                updated_at: Utc::now(),
                ..self.record.clone()
            };
            // bookkeeping only: a concurrent update takes precedence
            let swapped = ExchangeStore::compare_and_swap(provider, &self.record, &updated)
                .await
                .map_err(|e| Error::InvalidRequest(format!("issue saving exchange record: {e}")))?;
            if !swapped {
                tracing::debug!(
                    exchange_id = %self.record.exchange_id,
                    "exchange changed concurrently, state not updated"
                );
            }
        }

        let signer = KeyOps::signer(provider, credential_issuer)
            .map_err(|e| Error::InvalidRequest(format!("issue getting signer: {e}")))?;
        let mut response =
            assembler::assemble(
                &self.record,
                &self.supported,
                &request.types,
                holder_kid.as_deref(),
                &signer,
            )
            .await?;

        if c_nonce.is_some() {
            response.c_nonce = c_nonce;
            response.c_nonce_expires_in = Some(Expire::Nonce.duration().num_seconds());
        }
        Ok(response)
    }
}
