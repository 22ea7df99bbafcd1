use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::ExchangeState;

/// Request to create an exchange record for the specified supported
/// credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CreateExchangeRequest {
    /// The supported credential to issue.
    pub supported_cred_id: String,

    /// Claims about the subject. Each must be declared by the supported
    /// credential.
    pub credential_subject: Map<String, Value>,

    /// Optional user PIN the Wallet must present with the pre-authorized
    /// code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

/// Request to list exchange records, optionally filtered.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ListExchangesRequest {
    /// Only records for this supported credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_cred_id: Option<String>,

    /// Only records in this state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ExchangeState>,
}

/// Request to remove an exchange record.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RemoveExchangeRequest {
    /// The exchange to remove.
    pub exchange_id: String,
}

/// Results of a list request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ListResponse<T> {
    /// Matching records.
    pub results: Vec<T>,
}
