use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// The Credential Request is made to the Credential Endpoint, authorized with
/// the Access Token issued at the Token Endpoint.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialRequest {
    /// The `Authorization` header value, as received by the HTTP layer.
    /// Expected to be of the form `Bearer <access_token>`.
    #[serde(skip)]
    pub authorization: Option<String>,

    /// Format of the Credential to be issued. Must be `jwt_vc_json`.
    #[serde(default)]
    pub format: String,

    /// Credential types the Wallet is requesting. When set, must be a subset
    /// of the types offered by the supported credential.
    #[serde(default)]
    pub types: Vec<String>,

    /// Wallet's proof of possession of cryptographic key material the issued
    /// Credential will be bound to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

/// Wallet's proof of possession of the key material the issued Credential is
/// to be bound to.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Proof {
    /// Proof type. Must be `jwt`.
    pub proof_type: String,

    /// A compact JWS signed by the Wallet's key. The header `kid` identifies
    /// the key and the payload carries the `c_nonce`.
    pub jwt: String,
}

/// Claims carried by the proof of possession JWT.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProofClaims {
    /// The `client_id` of the Client making the Credential request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// The Credential Issuer Identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// The time at which the proof was issued.
    #[serde(default)]
    pub iat: i64,

    /// The `c_nonce` provided by the Credential Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// The Credential Response contains the issued Credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialResponse {
    /// Format of the issued Credential.
    pub format: String,

    /// The issued Credential, a compact JWS.
    pub credential: String,

    /// A fresh nonce to be used to create a proof of possession for any
    /// subsequent Credential Request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_nonce: Option<String>,

    /// The lifetime in seconds of the `c_nonce` parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_nonce_expires_in: Option<i64>,
}
