//! # W3C Verifiable Credentials Data Model
//!
//! The subset of the [VC Data Model v1.1] needed to issue `jwt_vc_json`
//! credentials, and the JWT claims envelope the credential is signed in.
//!
//! [VC Data Model v1.1]: https://www.w3.org/TR/vc-data-model

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `VerifiableCredential` represents a naive implementation of the W3C
/// Verifiable Credential data model v1.1.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    /// The @context property is used to map property URIs into short-form
    /// aliases.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// The credential's URI. Always a `urn:uuid:` for issued credentials.
    pub id: String,

    /// The type property is used to uniquely identify the type of the
    /// credential.
    #[serde(rename = "type")]
    pub type_: Vec<String>,

    /// A URI or object with an id property. It is RECOMMENDED that the
    /// URI/object id, dereferences to machine-readable information about
    /// the issuer that can be used to verify credential information.
    pub issuer: String,

    /// An XMLSCHEMA11-2 (RFC3339) date-time the credential becomes valid,
    /// with seconds precision and a `Z` offset.
    #[serde(with = "issuance_date")]
    pub issuance_date: DateTime<Utc>,

    /// A set of objects containing claims about the credential subject(s).
    pub credential_subject: CredentialSubject,
}

/// `CredentialSubject` holds claims about the subject(s) referenced by the
/// credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialSubject {
    /// A URI that uniquely identifies the subject of the claims. For a bound
    /// credential, the holder's key identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Claims about the subject.
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

/// Claims used for Verifiable Credential issuance when format is
/// "`jwt_vc_json`".
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct VcClaims {
    /// MUST be the `issuer` property of the Credential.
    pub iss: String,

    /// The `credentialSubject.id` property of the Credential, when the
    /// credential is bound to a holder key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// MUST be the Credential's `issuanceDate`, encoded as a UNIX timestamp.
    pub nbf: i64,

    /// MUST be the `id` property of the Credential.
    pub jti: String,

    /// The Verifiable Credential.
    pub vc: VerifiableCredential,
}

impl From<VerifiableCredential> for VcClaims {
    fn from(vc: VerifiableCredential) -> Self {
        Self {
            iss: vc.issuer.clone(),
            sub: vc.credential_subject.id.clone(),
            nbf: vc.issuance_date.timestamp(),
            jti: vc.id.clone(),
            vc,
        }
    }
}

/// [`VcBuilder`] is used to build a [`VerifiableCredential`].
#[derive(Clone, Default)]
pub struct VcBuilder {
    vc: VerifiableCredential,
}

impl VcBuilder {
    /// Returns a new [`VcBuilder`] with the issuance date set to now.
    #[must_use]
    pub fn new() -> Self {
        tracing::debug!("VcBuilder::new");

        let mut builder = Self::default();
        builder.vc.issuance_date = Utc::now();
        builder
    }

    /// Sets the `@context` property.
    #[must_use]
    pub fn context(mut self, context: Vec<String>) -> Self {
        self.vc.context = context;
        self
    }

    /// Sets the `type` property.
    #[must_use]
    pub fn types(mut self, types: Vec<String>) -> Self {
        self.vc.type_ = types;
        self
    }

    /// Sets the `id` property.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.vc.id = id.into();
        self
    }

    /// Sets the `issuer` property.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.vc.issuer = issuer.into();
        self
    }

    /// Sets the `credentialSubject` property.
    #[must_use]
    pub fn subject(mut self, subject: CredentialSubject) -> Self {
        self.vc.credential_subject = subject;
        self
    }

    /// Turns this builder into a [`VerifiableCredential`].
    ///
    /// # Errors
    ///
    /// Fails if any of the VC's mandatory fields are not set.
    pub fn build(self) -> anyhow::Result<VerifiableCredential> {
        tracing::debug!("VcBuilder::build");

        if self.vc.context.is_empty() {
            bail!("no context set");
        }
        if self.vc.id.is_empty() {
            bail!("no id set");
        }
        if self.vc.type_.is_empty() {
            bail!("no type set");
        }
        if self.vc.issuer.is_empty() {
            bail!("no issuer set");
        }

        Ok(self.vc)
    }
}

mod issuance_date {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s).map(|dt| dt.with_timezone(&Utc)).map_err(D::Error::custom)
    }
}
