use std::collections::HashMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Request for the Credential Offer of an exchange. Generates a fresh
/// pre-authorized code.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialOfferRequest {
    /// The exchange to offer.
    pub exchange_id: String,
}

/// A Credential Offer, passed to the Wallet (typically as a QR code or deep
/// link) to begin the Pre-Authorized Code Flow.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialOffer {
    /// The URL of the Credential Issuer the Wallet is requested to obtain one
    /// or more Credentials from.
    pub credential_issuer: String,

    /// Identifiers of the supported credentials being offered.
    pub credentials: Vec<String>,

    /// Grants the Wallet may use, keyed by grant type.
    pub grants: HashMap<String, PreAuthorizedCodeGrant>,
}

/// The Pre-Authorized Code Grant.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PreAuthorizedCodeGrant {
    /// The code representing the Credential Issuer's authorization for the
    /// Wallet to obtain Credentials of the offered type.
    #[serde(rename = "pre-authorized_code")]
    pub pre_authorized_code: String,

    /// Whether the Wallet must send a user PIN with the Token Request.
    pub user_pin_required: bool,
}
