//! State is used by the library to persist exchange information between steps
//! in the issuance process.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::generate;

/// An `ExchangeRecord` tracks a single pre-authorized issuance from creation
/// through to the issued credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExchangeRecord {
    /// Unique identifier of the exchange.
    pub exchange_id: String,

    /// Current stage of the exchange.
    pub state: ExchangeState,

    /// The pre-authorized code offered to the Wallet. Unique across records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Identifies the supported credential to be issued.
    pub supported_cred_id: String,

    /// Claims about the subject to include in the issued credential.
    pub credential_subject: Map<String, Value>,

    /// User PIN the Wallet must present alongside the pre-authorized code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,

    /// Access token minted for the exchange.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Time the access token expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<DateTime<Utc>>,

    /// The current `c_nonce` the Wallet's proof must be bound to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Time the current `c_nonce` expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce_expires_at: Option<DateTime<Utc>>,

    /// Time the record was created.
    pub created_at: DateTime<Utc>,

    /// Time the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ExchangeRecord {
    /// Create a new exchange record in the `created` state.
    #[must_use]
    pub fn new(
        supported_cred_id: impl Into<String>, credential_subject: Map<String, Value>,
        pin: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            exchange_id: generate::exchange_id(),
            state: ExchangeState::Created,
            supported_cred_id: supported_cred_id.into(),
            credential_subject,
            pin,
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    /// Determines whether the access token has expired. A record without a
    /// token is treated as expired.
    #[must_use]
    pub fn token_expired(&self) -> bool {
        self.token_expires_at.map_or(true, |exp| exp <= Utc::now())
    }

    /// Determines whether the current `c_nonce` has expired. A record without
    /// a nonce is treated as expired.
    #[must_use]
    pub fn nonce_expired(&self) -> bool {
        self.nonce_expires_at.map_or(true, |exp| exp <= Utc::now())
    }
}

/// Exchange stages.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeState {
    /// The record has been created but not yet offered.
    #[default]
    Created,

    /// A pre-authorized code has been generated and offered to the Wallet.
    Offer,

    /// The pre-authorized code has been exchanged for an access token.
    TokenIssued,

    /// At least one credential has been issued.
    Issued,
}

/// Selects exchange records from the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Records holding the pre-authorized code.
    Code(String),

    /// Records holding the access token.
    Token(String),

    /// Records matching all of the set criteria.
    Exchange {
        /// Supported credential id.
        supported_cred_id: Option<String>,

        /// Exchange state.
        state: Option<ExchangeState>,
    },
}

impl Filter {
    /// Whether the record satisfies the filter.
    #[must_use]
    pub fn matches(&self, record: &ExchangeRecord) -> bool {
        match self {
            Self::Code(code) => record.code.as_ref() == Some(code),
            Self::Token(token) => record.token.as_ref() == Some(token),
            Self::Exchange {
                supported_cred_id,
                state,
            } => {
                supported_cred_id.as_ref().map_or(true, |id| id == &record.supported_cred_id)
                    && state.map_or(true, |s| s == record.state)
            }
        }
    }
}

/// Expire enum.
pub enum Expire {
    /// Access token expiration.
    Access,
    /// Nonce expiration.
    Nonce,
}

impl Expire {
    /// Duration of the state.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        match self {
            Self::Access => TimeDelta::try_seconds(300).unwrap_or_default(),
            Self::Nonce => TimeDelta::try_seconds(86_400).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record() -> ExchangeRecord {
        let Value::Object(subject) = json!({"name": "Alice Smith"}) else {
            panic!("should be an object");
        };
        ExchangeRecord::new("UniversityDegreeCredential", subject, None)
    }

    #[test]
    fn new_record() {
        let record = record();
        assert_eq!(record.state, ExchangeState::Created);
        assert!(record.code.is_none());
        assert!(record.token_expired());
        assert!(record.nonce_expired());
    }

    #[test]
    fn filter_matches() {
        let mut record = record();
        record.code = Some("abc".into());

        assert!(Filter::Code("abc".into()).matches(&record));
        assert!(!Filter::Code("xyz".into()).matches(&record));
        assert!(!Filter::Token("abc".into()).matches(&record));

        let all = Filter::Exchange {
            supported_cred_id: None,
            state: None,
        };
        assert!(all.matches(&record));

        let offered = Filter::Exchange {
            supported_cred_id: Some("UniversityDegreeCredential".into()),
            state: Some(ExchangeState::Offer),
        };
        assert!(!offered.matches(&record));
    }

    #[test]
    fn state_serializes_snake_case() {
        let ser = serde_json::to_value(ExchangeState::TokenIssued).expect("should serialize");
        assert_eq!(ser, json!("token_issued"));
    }
}
