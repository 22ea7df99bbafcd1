//! Administrative operations: supported credentials, exchange records,
//! credential offers and issuer metadata.

mod utils;

use serde_json::json;
use test_utils::issuer::{CREDENTIAL_ISSUER, SUPPORTED_CRED_ID};
use vercre_exchange::state::ExchangeState;
use vercre_exchange::{
    endpoint, CreateExchangeRequest, CreateSupportedRequest, CredentialOfferRequest, Error,
    ListExchangesRequest, ListSupportedRequest, MetadataRequest, RemoveExchangeRequest,
    RemoveSupportedRequest, SupportedCredential, PRE_AUTHORIZED_GRANT,
};

#[tokio::test]
async fn metadata() {
    test_utils::init_tracer();
    let provider = utils::provider();

    let metadata = endpoint::handle(CREDENTIAL_ISSUER, MetadataRequest {}, &provider)
        .await
        .expect("should get metadata");
    assert_eq!(metadata.credential_issuer, CREDENTIAL_ISSUER);
    assert_eq!(metadata.credential_endpoint, format!("{CREDENTIAL_ISSUER}/draft-13/credential"));
    assert_eq!(metadata.credentials_supported.len(), 1);

    let degree = &metadata.credentials_supported[0];
    assert_eq!(degree["id"], SUPPORTED_CRED_ID);
    assert_eq!(degree["format"], "jwt_vc_json");
    assert_eq!(degree["types"], json!(["VerifiableCredential", "UniversityDegreeCredential"]));
    assert_eq!(degree["cryptographic_binding_methods_supported"], json!(["did"]));
}

#[tokio::test]
async fn supported_credentials() {
    test_utils::init_tracer();
    let provider = utils::provider();

    let supported: SupportedCredential = serde_json::from_value(json!({
        "id": "EmployeeIDCredential",
        "format": "jwt_vc_json",
        "format_data": {
            "types": ["VerifiableCredential", "EmployeeIDCredential"],
            "credentialSubject": {"employee_id": {}, "name": {}}
        },
        "vc_additional_data": {
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential", "EmployeeIDCredential"]
        }
    }))
    .expect("should deserialize");

    let request = CreateSupportedRequest {
        supported: supported.clone(),
    };
    let created = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect("create");
    assert_eq!(created, supported);

    let list = endpoint::handle(CREDENTIAL_ISSUER, ListSupportedRequest {}, &provider)
        .await
        .expect("should list");
    assert_eq!(list.results.len(), 2);

    let request = RemoveSupportedRequest {
        supported_cred_id: "EmployeeIDCredential".into(),
    };
    endpoint::handle(CREDENTIAL_ISSUER, request.clone(), &provider).await.expect("remove");
    let err = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect_err("gone");
    assert!(matches!(err, Error::NotFound(_)));

    // only jwt_vc_json credentials can be offered
    let mut request = CreateSupportedRequest { supported };
    request.supported.format = "ldp_vc".into();
    let err = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect_err("format");
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}

#[tokio::test]
async fn create_exchange() {
    test_utils::init_tracer();
    let provider = utils::provider();

    let request = CreateExchangeRequest {
        supported_cred_id: "UnknownCredential".into(),
        credential_subject: utils::subject(json!({"name": "Alice Smith"})),
        pin: None,
    };
    let err = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect_err("unknown");
    assert!(matches!(err, Error::NotFound(_)));

    let request = CreateExchangeRequest {
        supported_cred_id: SUPPORTED_CRED_ID.into(),
        credential_subject: utils::subject(json!({"name": "Alice Smith", "ssn": "123-45-6789"})),
        pin: None,
    };
    let err = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect_err("claim");
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[tokio::test]
async fn list_and_remove_exchanges() {
    test_utils::init_tracer();
    let provider = utils::provider();

    let (offered, _) = utils::offer(&provider, None).await;
    let (redeemed, code) = utils::offer(&provider, None).await;
    utils::token(&provider, &code, None).await.expect("should issue token");

    let request = ListExchangesRequest::default();
    let all = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect("list");
    assert_eq!(all.results.len(), 2);

    let request = ListExchangesRequest {
        supported_cred_id: Some(SUPPORTED_CRED_ID.into()),
        state: Some(ExchangeState::TokenIssued),
    };
    let issued = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect("list");
    assert_eq!(issued.results.len(), 1);
    assert_eq!(issued.results[0].exchange_id, redeemed.exchange_id);

    let request = RemoveExchangeRequest {
        exchange_id: offered.exchange_id.clone(),
    };
    let removed = endpoint::handle(CREDENTIAL_ISSUER, request.clone(), &provider)
        .await
        .expect("should remove");
    assert_eq!(removed.exchange_id, offered.exchange_id);
    let err = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect_err("gone");
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn credential_offer() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let (record, first_code) = utils::offer(&provider, Some("493536")).await;

    // offering again replaces the code
    let request = CredentialOfferRequest {
        exchange_id: record.exchange_id.clone(),
    };
    let offer = endpoint::handle(CREDENTIAL_ISSUER, request.clone(), &provider)
        .await
        .expect("should offer");
    assert_eq!(offer.credential_issuer, CREDENTIAL_ISSUER);
    let grant = &offer.grants[PRE_AUTHORIZED_GRANT];
    assert!(grant.user_pin_required);
    assert_ne!(grant.pre_authorized_code, first_code);

    let err = utils::token(&provider, &first_code, Some("493536")).await.expect_err("replaced");
    assert!(matches!(err, Error::NotFound(_)));
    utils::token(&provider, &grant.pre_authorized_code, Some("493536")).await.expect("token");

    // a redeemed exchange cannot be offered again
    let err = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect_err("redeemed");
    assert!(matches!(err, Error::InvalidRequest(_)));

    let request = CredentialOfferRequest {
        exchange_id: "unknown".into(),
    };
    let err = endpoint::handle(CREDENTIAL_ISSUER, request, &provider).await.expect_err("unknown");
    assert!(matches!(err, Error::NotFound(_)));
}
