use std::collections::HashMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default `@context` for issued credentials.
pub const W3C_CREDENTIALS_V1: &str = "https://www.w3.org/2018/credentials/v1";

/// Default base type for issued credentials.
pub const VERIFIABLE_CREDENTIAL: &str = "VerifiableCredential";

/// A credential the issuer is able to issue, as held in the catalog.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SupportedCredential {
    /// Identifies the supported credential. Referenced by exchange records and
    /// credential offers.
    #[serde(rename = "id", alias = "identifier")]
    pub identifier: String,

    /// Credential format. Only `jwt_vc_json` is supported.
    pub format: String,

    /// Ways the issued credential may be bound to the Wallet's key material.
    /// When non-empty, Credential Requests must carry a proof.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cryptographic_binding_methods_supported: Vec<String>,

    /// Signing algorithms the issuer supports for the credential.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cryptographic_suites_supported: Vec<String>,

    /// Display properties of the credential for each supported language.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display: Vec<CredentialDisplay>,

    /// Format-specific metadata.
    pub format_data: FormatData,

    /// Template for the `@context` and `type` of issued credentials.
    #[serde(default)]
    pub vc_additional_data: VcTemplate,
}

/// Format-specific metadata for `jwt_vc_json` credentials.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct FormatData {
    /// Credential types offered.
    pub types: Vec<String>,

    /// Claims that may appear in the credential subject, keyed by claim name
    /// with display metadata as the value.
    #[serde(rename = "credentialSubject", default, skip_serializing_if = "Map::is_empty")]
    pub credential_subject: Map<String, Value>,
}

/// Template for the `@context` and `type` of issued credentials.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct VcTemplate {
    /// JSON-LD contexts.
    #[serde(rename = "@context", default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,

    /// Credential types.
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub type_: Vec<String>,
}

/// Language-specific display properties for a credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialDisplay {
    /// Display name for the credential.
    pub name: String,

    /// Language tag ([BCP47]) of the display properties.
    ///
    /// [BCP47]: https://www.rfc-editor.org/rfc/rfc5646
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Background color of the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    /// Text color of the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl SupportedCredential {
    /// The claims catalog: for each offered type, the subject attributes it
    /// allows.
    ///
    /// The declared attributes belong to the descriptor's specific types. The
    /// base `VerifiableCredential` type allows none, unless it is the only
    /// type offered.
    #[must_use]
    pub fn claims(&self) -> HashMap<String, Vec<String>> {
        let attributes: Vec<String> = self.format_data.credential_subject.keys().cloned().collect();
        let types = &self.format_data.types;
        let base_only = types.iter().all(|t| t == VERIFIABLE_CREDENTIAL);

        types
            .iter()
            .map(|t| {
                let allowed =
                    if base_only || t != VERIFIABLE_CREDENTIAL { attributes.clone() } else { vec![] };
                (t.clone(), allowed)
            })
            .collect()
    }

    /// The `@context` for issued credentials.
    #[must_use]
    pub fn vc_context(&self) -> Vec<String> {
        if self.vc_additional_data.context.is_empty() {
            return vec![W3C_CREDENTIALS_V1.to_string()];
        }
        self.vc_additional_data.context.clone()
    }

    /// The `type` for issued credentials.
    #[must_use]
    pub fn vc_types(&self) -> Vec<String> {
        if !self.vc_additional_data.type_.is_empty() {
            return self.vc_additional_data.type_.clone();
        }

        let mut types = vec![VERIFIABLE_CREDENTIAL.to_string()];
        for t in &self.format_data.types {
            if !types.contains(t) {
                types.push(t.clone());
            }
        }
        types
    }

    /// Render the entry published in the issuer's metadata.
    #[must_use]
    pub fn to_issuer_metadata(&self) -> Value {
        let mut metadata = Map::new();
        metadata.insert("id".into(), Value::String(self.identifier.clone()));
        metadata.insert("format".into(), Value::String(self.format.clone()));

        if !self.cryptographic_binding_methods_supported.is_empty() {
            metadata.insert(
                "cryptographic_binding_methods_supported".into(),
                self.cryptographic_binding_methods_supported.iter().cloned().map(Value::String).collect(),
            );
        }
        if !self.cryptographic_suites_supported.is_empty() {
            metadata.insert(
                "cryptographic_suites_supported".into(),
                self.cryptographic_suites_supported.iter().cloned().map(Value::String).collect(),
            );
        }
        if !self.display.is_empty() {
            metadata.insert("display".into(), serde_json::to_value(&self.display).unwrap_or_default());
        }

        if let Ok(Value::Object(format_data)) = serde_json::to_value(&self.format_data) {
            metadata.extend(format_data);
        }

        Value::Object(metadata)
    }
}

/// Request to add a supported credential to the catalog.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CreateSupportedRequest {
    /// The supported credential to add.
    #[serde(flatten)]
    pub supported: SupportedCredential,
}

/// Request to list the catalog.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ListSupportedRequest {}

/// Request to remove a supported credential from the catalog.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RemoveSupportedRequest {
    /// Identifier of the supported credential to remove.
    pub supported_cred_id: String,
}
