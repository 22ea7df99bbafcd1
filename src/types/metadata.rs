use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to retrieve the Credential Issuer's configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MetadataRequest {}

/// Credential Issuer metadata, published at
/// `/.well-known/openid-credential-issuer`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MetadataResponse {
    /// The Credential Issuer's identifier.
    pub credential_issuer: String,

    /// URL of the Credential Issuer's Credential Endpoint.
    pub credential_endpoint: String,

    /// Credentials the issuer is able to issue.
    pub credentials_supported: Vec<Value>,
}
