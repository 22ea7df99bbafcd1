//! Credential endpoint: authentication, proof validation and nonce handling.

mod utils;

use chrono::{TimeDelta, Utc};
use serde_json::json;
use test_utils::faulty::FaultyProvider;
use test_utils::holder::Keyring;
use test_utils::issuer::{ProviderImpl, CREDENTIAL_ISSUER};
use vercre_exchange::jose::{jws, Jwt};
use vercre_exchange::provider::{Catalog, ExchangeStore};
use vercre_exchange::state::{ExchangeRecord, Filter};
use vercre_exchange::vc::VcClaims;
use vercre_exchange::{
    did, CreateExchangeRequest, CredentialRequest, Error, FormatData, SupportedCredential,
    TokenResponse,
};

async fn issued_token(provider: &ProviderImpl) -> TokenResponse {
    let (_, code) = utils::offer(provider, None).await;
    utils::token(provider, &code, None).await.expect("should issue token")
}

async fn credential_request(token: &TokenResponse, nonce: &str) -> CredentialRequest {
    let proof = Keyring::new().proof(CREDENTIAL_ISSUER, nonce).await.expect("should sign proof");
    CredentialRequest {
        authorization: utils::bearer(token),
        format: "jwt_vc_json".into(),
        types: vec![],
        proof: Some(proof),
    }
}

async fn record(provider: &ProviderImpl, token: &TokenResponse) -> ExchangeRecord {
    let mut records = provider
        .query(&Filter::Token(token.access_token.clone()))
        .await
        .expect("should query");
    records.pop().expect("should have record")
}

// A proof bound to another nonce is forbidden and consumes nothing.
#[tokio::test]
async fn wrong_nonce() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;

    let request = credential_request(&token, "not-the-nonce").await;
    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, provider.clone(), request)
        .await
        .expect_err("should fail");
    assert_eq!(err, Error::Forbidden("invalid proof: wrong nonce".into()));

    // nonce is still usable
    assert_eq!(record(&provider, &token).await.nonce, Some(token.c_nonce.clone()));
    let request = credential_request(&token, &token.c_nonce).await;
    vercre_exchange::credential(CREDENTIAL_ISSUER, provider, request).await.expect("should issue");
}

// A proof cannot be used twice. The fresh nonce from the response can.
#[tokio::test]
async fn nonce_replay() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;

    let request = credential_request(&token, &token.c_nonce).await;
    let response = vercre_exchange::credential(CREDENTIAL_ISSUER, provider.clone(), request.clone())
        .await
        .expect("should issue");

    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, provider.clone(), request)
        .await
        .expect_err("should fail");
    assert!(matches!(err, Error::Forbidden(_)));

    let next_nonce = response.c_nonce.expect("should have fresh nonce");
    let request = credential_request(&token, &next_nonce).await;
    vercre_exchange::credential(CREDENTIAL_ISSUER, provider, request).await.expect("should issue");
}

// Two requests with the same proof in flight together: exactly one is
// issued.
#[tokio::test]
async fn concurrent_replay() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;
    let request = credential_request(&token, &token.c_nonce).await;

    let (first, second) = tokio::join!(
        vercre_exchange::credential(CREDENTIAL_ISSUER, provider.clone(), request.clone()),
        vercre_exchange::credential(CREDENTIAL_ISSUER, provider.clone(), request)
    );
    assert!(first.is_ok() ^ second.is_ok());
}

// A request that read the nonce before another request consumed it loses
// the conditional update.
#[tokio::test]
async fn lost_race() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;
    let request = credential_request(&token, &token.c_nonce).await;

    let stale = FaultyProvider::new(provider.clone());
    stale.freeze().await.expect("should freeze");
    vercre_exchange::credential(CREDENTIAL_ISSUER, provider.clone(), request.clone())
        .await
        .expect("should issue");

    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, stale.clone(), request)
        .await
        .expect_err("should fail");
    assert_eq!(err, Error::InvalidProof("`c_nonce` has already been used".into()));
    assert_eq!(stale.lost_swaps(), 1);
}

// Store and keystore failures are reported as bad requests and consume
// nothing.
#[tokio::test]
async fn provider_unavailable() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;
    let request = credential_request(&token, &token.c_nonce).await;
    let faulty = FaultyProvider::new(provider.clone());

    faulty.store_offline();
    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, faulty.clone(), request.clone())
        .await
        .expect_err("should fail");
    assert_eq!(
        err,
        Error::InvalidRequest("issue querying exchange records: exchange store offline".into())
    );

    faulty.signer_offline();
    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, faulty, request.clone())
        .await
        .expect_err("should fail");
    assert_eq!(err, Error::InvalidRequest("issue getting signer: keystore offline".into()));

    assert_eq!(record(&provider, &token).await.nonce, Some(token.c_nonce.clone()));
    vercre_exchange::credential(CREDENTIAL_ISSUER, provider, request).await.expect("should issue");
}

// A proof whose signature does not match its `kid` is rejected.
#[tokio::test]
async fn forged_proof() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;

    let mut request = credential_request(&token, &token.c_nonce).await;
    let other = Keyring::random().proof(CREDENTIAL_ISSUER, &token.c_nonce).await.expect("proof");
    let Some(proof) = request.proof.as_mut() else {
        panic!("should have proof");
    };
    let (payload, _) = proof.jwt.rsplit_once('.').expect("should have signature");
    let (_, signature) = other.jwt.rsplit_once('.').expect("should have signature");
    proof.jwt = format!("{payload}.{signature}");

    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, provider, request)
        .await
        .expect_err("should fail");
    assert!(matches!(err, Error::InvalidProof(_)));
}

#[tokio::test]
async fn proof_required() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;

    let mut request = credential_request(&token, &token.c_nonce).await;
    request.proof = None;
    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, provider, request)
        .await
        .expect_err("should fail");
    assert!(matches!(err, Error::InvalidProof(_)));
}

#[tokio::test]
async fn authorization() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;

    let mut request = credential_request(&token, &token.c_nonce).await;
    for authorization in [None, Some(format!("Basic {}", token.access_token))] {
        request.authorization = authorization;
        let err = vercre_exchange::credential(CREDENTIAL_ISSUER, provider.clone(), request.clone())
            .await
            .expect_err("should fail");
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    // a token minted by another issuer's key
    request.authorization = utils::bearer(&token);
    let err = vercre_exchange::credential("http://other.io", provider, request)
        .await
        .expect_err("should fail");
    assert!(matches!(err, Error::Unauthorized(_)));
}

#[tokio::test]
async fn expired() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;
    let request = credential_request(&token, &token.c_nonce).await;

    let current = record(&provider, &token).await;
    let mut updated = current.clone();
    updated.nonce_expires_at = Some(Utc::now() - TimeDelta::try_seconds(1).unwrap_or_default());
    provider.put(&updated).await.expect("should save");

    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, provider.clone(), request.clone())
        .await
        .expect_err("should fail");
    assert!(matches!(err, Error::InvalidProof(_)));

    updated.token_expires_at = updated.nonce_expires_at;
    provider.put(&updated).await.expect("should save");

    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, provider, request)
        .await
        .expect_err("should fail");
    assert!(matches!(err, Error::InvalidToken(_)));
}

#[tokio::test]
async fn unsupported() {
    test_utils::init_tracer();
    let provider = utils::provider();
    let token = issued_token(&provider).await;

    let mut request = credential_request(&token, &token.c_nonce).await;
    request.format = "ldp_vc".into();
    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, provider.clone(), request.clone())
        .await
        .expect_err("should fail");
    assert!(matches!(err, Error::UnsupportedFormat(_)));

    request.format = "jwt_vc_json".into();
    request.types = vec!["DriversLicense".into()];
    let err = vercre_exchange::credential(CREDENTIAL_ISSUER, provider, request)
        .await
        .expect_err("should fail");
    assert!(matches!(err, Error::UnsupportedCredentialType(_)));
}

// Without binding methods a credential may be issued without a proof. It
// then has no subject id.
#[tokio::test]
async fn unbound_credential() {
    test_utils::init_tracer();
    let provider = utils::provider();

    let supported = SupportedCredential {
        identifier: "MembershipCredential".into(),
        format: "jwt_vc_json".into(),
        format_data: FormatData {
            types: vec!["VerifiableCredential".into(), "MembershipCredential".into()],
            credential_subject: utils::subject(json!({"member_since": {}})),
        },
        ..SupportedCredential::default()
    };
    provider.add(&supported).await.expect("should add");

    let request = CreateExchangeRequest {
        supported_cred_id: "MembershipCredential".into(),
        credential_subject: utils::subject(json!({"member_since": "2019"})),
        pin: None,
    };
    let record = vercre_exchange::create_exchange(CREDENTIAL_ISSUER, provider.clone(), request)
        .await
        .expect("should create");
    let offer = vercre_exchange::credential_offer(
        CREDENTIAL_ISSUER,
        provider.clone(),
        vercre_exchange::CredentialOfferRequest {
            exchange_id: record.exchange_id,
        },
    )
    .await
    .expect("should offer");
    let code = &offer.grants[vercre_exchange::PRE_AUTHORIZED_GRANT].pre_authorized_code;
    let token = utils::token(&provider, code, None).await.expect("should issue token");

    let request = CredentialRequest {
        authorization: utils::bearer(&token),
        format: "jwt_vc_json".into(),
        types: vec![],
        proof: None,
    };
    let stale = FaultyProvider::new(provider.clone());
    stale.freeze().await.expect("should freeze");

    let response = vercre_exchange::credential(CREDENTIAL_ISSUER, provider, request.clone())
        .await
        .expect("should issue");
    assert!(response.c_nonce.is_none());

    // losing the state update does not block an unbound credential
    vercre_exchange::credential(CREDENTIAL_ISSUER, stale.clone(), request)
        .await
        .expect("should issue");
    assert_eq!(stale.lost_swaps(), 1);

    let jwt: Jwt<VcClaims> =
        jws::decode(&response.credential, did::resolve_key).expect("should verify");
    assert!(jwt.claims.sub.is_none());
    assert!(jwt.claims.vc.credential_subject.id.is_none());
    assert_eq!(jwt.claims.vc.credential_subject.claims["member_since"], "2019");
}
