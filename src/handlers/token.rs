//! # Token Endpoint
//!
//! The Token Endpoint issues an Access Token in exchange for the
//! pre-authorized code the Wallet received in the Credential Offer. Each code
//! can be exchanged at most once.
//!
//! The access token is a JWS signed by the issuer's `did:key` identity and is
//! returned together with the `c_nonce` the Wallet must bind its proof of
//! possession to.
//!
//! The authorization server MUST include the HTTP "Cache-Control" response
//! header field with a value of "no-store" in any response containing tokens.

use std::future::Future;

use chrono::Utc;
use tracing::instrument;

use crate::core::generate;
use crate::endpoint::Handler;
use crate::handlers::find_one;
use crate::jose::{jws, Type};
use crate::provider::{ExchangeStore, KeyOps, Provider};
use crate::state::{ExchangeRecord, ExchangeState, Expire, Filter};
use crate::types::{
    AccessTokenClaims, TokenRequest, TokenResponse, TokenType, PRE_AUTHORIZED_GRANT,
};
use crate::{Error, Result};

/// Token request handler.
///
/// # Errors
///
/// Returns an `OpenID` error if the request is invalid, the code is unknown or
/// already used, or the provider is not available.
#[instrument(level = "debug", skip(provider))]
pub async fn token(
    credential_issuer: &str, provider: impl Provider, request: TokenRequest,
) -> Result<TokenResponse> {
    if request.grant_type != PRE_AUTHORIZED_GRANT {
        return Err(Error::UnsupportedGrantType(format!(
            "unsupported `grant_type`: {}",
            request.grant_type
        )));
    }
    if request.pre_authorized_code.is_empty() {
        return Err(Error::InvalidRequest("`pre-authorized_code` is missing".into()));
    }

    let filter = Filter::Code(request.pre_authorized_code.clone());
    let Some(record) = find_one(&provider, &filter).await? else {
        return Err(Error::NotFound("no exchange found for pre-authorized code".into()));
    };

    let ctx = Context { record };
    ctx.verify(&request)?;
    ctx.process(credential_issuer, &provider).await
}

impl Handler for TokenRequest {
    type Response = TokenResponse;

    fn handle(
        self, credential_issuer: &str, provider: &impl Provider,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        token(credential_issuer, provider.clone(), self)
    }
}

#[derive(Debug)]
struct Context {
    record: ExchangeRecord,
}

impl Context {
    fn verify(&self, request: &TokenRequest) -> Result<()> {
        tracing::debug!("token::verify");

        // pre-authorized code is one-time use
        if self.record.token.is_some() {
            return Err(Error::InvalidGrant("pre-authorized code has already been used".into()));
        }

        if let Some(pin) = &self.record.pin {
            if request.user_pin.as_ref() != Some(pin) {
                return Err(Error::InvalidGrant("invalid `user_pin` provided".into()));
            }
        }

        Ok(())
    }

    async fn process(
        &self, credential_issuer: &str, provider: &impl Provider,
    ) -> Result<TokenResponse> {
        tracing::debug!("token::process");

        let signer = KeyOps::signer(provider, credential_issuer)
            .map_err(|e| Error::InvalidRequest(format!("issue getting signer: {e}")))?;

        let now = Utc::now();
        let token_expires_at = now + Expire::Access.duration();
        let nonce_expires_at = now + Expire::Nonce.duration();

        let claims = AccessTokenClaims {
            iss: credential_issuer.to_string(),
            sub: self.record.exchange_id.clone(),
            scope: self.record.supported_cred_id.clone(),
            iat: now.timestamp(),
            exp: token_expires_at.timestamp(),
            jti: generate::token_id(),
        };
        let access_token = jws::encode(Type::Jwt, &claims, &signer)
            .await
            .map_err(|e| Error::InvalidRequest(format!("issue signing access token: {e}")))?;
        let c_nonce = generate::nonce();

        let updated = ExchangeRecord {
            state: ExchangeState::TokenIssued,
            token: Some(access_token.clone()),
            token_expires_at: Some(token_expires_at),
            nonce: Some(c_nonce.clone()),
            nonce_expires_at: Some(nonce_expires_at),
            updated_at: now,
            ..self.record.clone()
        };

        // only succeeds if no concurrent request has updated the record
        let swapped = ExchangeStore::compare_and_swap(provider, &self.record, &updated)
            .await
            .map_err(|e| Error::InvalidRequest(format!("issue saving exchange record: {e}")))?;
        if !swapped {
            tracing::warn!(exchange_id = %self.record.exchange_id, "token request lost race");
            return Err(Error::InvalidGrant("pre-authorized code was redeemed concurrently".into()));
        }

        Ok(TokenResponse {
            access_token,
            token_type: TokenType::Bearer,
            expires_in: Expire::Access.duration().num_seconds(),
            c_nonce,
            c_nonce_expires_in: Expire::Nonce.duration().num_seconds(),
        })
    }
}
