#![allow(missing_docs)]
#![allow(dead_code)]

use serde_json::{Map, Value};
use test_utils::issuer::{ProviderImpl, CREDENTIAL_ISSUER, SUPPORTED_CRED_ID};
use vercre_exchange::state::ExchangeRecord;
use vercre_exchange::{
    CreateExchangeRequest, CredentialOfferRequest, TokenRequest, TokenResponse,
    PRE_AUTHORIZED_GRANT,
};

pub fn provider() -> ProviderImpl {
    ProviderImpl::new()
}

pub fn subject(value: Value) -> Map<String, Value> {
    let Value::Object(subject) = value else {
        panic!("subject should be an object");
    };
    subject
}

// Create an exchange for the degree credential and offer it, returning the
// record and its pre-authorized code.
pub async fn offer(provider: &ProviderImpl, pin: Option<&str>) -> (ExchangeRecord, String) {
    let request = CreateExchangeRequest {
        supported_cred_id: SUPPORTED_CRED_ID.into(),
        credential_subject: subject(serde_json::json!({"name": "Alice Smith", "degree": "BA"})),
        pin: pin.map(ToString::to_string),
    };
    let record = vercre_exchange::create_exchange(CREDENTIAL_ISSUER, provider.clone(), request)
        .await
        .expect("should create exchange");

    let request = CredentialOfferRequest {
        exchange_id: record.exchange_id.clone(),
    };
    let offer = vercre_exchange::credential_offer(CREDENTIAL_ISSUER, provider.clone(), request)
        .await
        .expect("should create offer");

    let grant = &offer.grants[PRE_AUTHORIZED_GRANT];
    (record, grant.pre_authorized_code.clone())
}

pub async fn token(
    provider: &ProviderImpl, code: &str, pin: Option<&str>,
) -> vercre_exchange::Result<TokenResponse> {
    let request = TokenRequest::pre_authorized(code, pin.map(ToString::to_string));
    vercre_exchange::token(CREDENTIAL_ISSUER, provider.clone(), request).await
}

pub fn bearer(token: &TokenResponse) -> Option<String> {
    Some(format!("Bearer {}", token.access_token))
}
