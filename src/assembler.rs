//! # Credential Assembler
//!
//! Builds the `jwt_vc_json` credential for an exchange and signs it with the
//! issuer's identity.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::core::generate;
use crate::did;
use crate::jose::{jws, Type};
use crate::provider::Signer;
use crate::state::ExchangeRecord;
use crate::types::{CredentialResponse, SupportedCredential, JWT_VC_JSON};
use crate::vc::{CredentialSubject, VcBuilder, VcClaims};
use crate::{Error, Result};

/// Assemble and sign the credential for the exchange record.
///
/// The subject is filtered to the attributes allowed by the requested
/// `types`, or by all of the supported credential's types when none were
/// requested.
///
/// When `holder_kid` is set, the credential is bound to the holder: the key
/// identifier becomes `credentialSubject.id` and the JWT `sub`.
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] if the credential cannot be built or
/// signed.
pub async fn assemble(
    record: &ExchangeRecord, supported: &SupportedCredential, types: &[String],
    holder_kid: Option<&str>, signer: &impl Signer,
) -> Result<CredentialResponse> {
    tracing::debug!("assembler::assemble");

    let types = if types.is_empty() { &supported.format_data.types } else { types };
    let claims = if supported.format_data.credential_subject.is_empty() {
        record.credential_subject.clone()
    } else {
        filter_subject(types, &record.credential_subject, &supported.claims())
    };

    let issuer = did::did_from_url(&signer.verification_method()).to_string();
    let vc = VcBuilder::new()
        .context(supported.vc_context())
        .types(supported.vc_types())
        .id(generate::credential_id())
        .issuer(issuer)
        .subject(CredentialSubject {
            id: holder_kid.map(ToString::to_string),
            claims,
        })
        .build()
        .map_err(|e| Error::InvalidRequest(format!("issue building credential: {e}")))?;

    let credential = jws::encode(Type::Jwt, &VcClaims::from(vc), signer)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue signing credential: {e}")))?;

    Ok(CredentialResponse {
        format: JWT_VC_JSON.to_string(),
        credential,
        c_nonce: None,
        c_nonce_expires_in: None,
    })
}

/// Keep only the subject attributes allowed by at least one of `types`.
/// Types missing from `claims` contribute no attributes.
#[must_use]
pub fn filter_subject(
    types: &[String], subject: &Map<String, Value>, claims: &HashMap<String, Vec<String>>,
) -> Map<String, Value> {
    let attributes: HashSet<&String> =
        types.iter().filter_map(|t| claims.get(t)).flatten().collect();
    subject.iter().filter(|(k, _)| attributes.contains(k)).map(|(k, v)| (k.clone(), v.clone())).collect()
}
