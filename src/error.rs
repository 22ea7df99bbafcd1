//! # Exchange Errors
//!
//! Errors are reported to callers using `OpenID` error codes with a
//! human-readable description. Transport layers map each variant onto an
//! HTTP status (see [`Error::code`]).

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Error codes for the pre-authorized code exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request is missing a required parameter, includes an unsupported
    /// parameter value, or is otherwise malformed. Also used to surface
    /// signing and storage failures along with their underlying reason.
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    /// The provided pre-authorized code is invalid, has already been used, or
    /// the accompanying user PIN does not match.
    #[error("invalid_grant: {0}")]
    InvalidGrant(String),

    /// The authorization grant type is not supported.
    #[error("unsupported_grant_type: {0}")]
    UnsupportedGrantType(String),

    /// The `Authorization` header is missing or malformed, uses an
    /// unsupported scheme, or carries a token that fails verification.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The access token is well-formed and correctly signed but is not
    /// associated with a live exchange.
    #[error("invalid_token: {0}")]
    InvalidToken(String),

    /// No record exists for the supplied identifier.
    #[error("not_found: {0}")]
    NotFound(String),

    /// The proof of possession was bound to a different `c_nonce`.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The Credential Request proof is missing, cannot be decoded, is not
    /// correctly signed, or the `c_nonce` it should be bound to has expired
    /// or already been consumed.
    #[error("invalid_proof: {0}")]
    InvalidProof(String),

    /// Requested credential format is not supported.
    #[error("unsupported_credential_format: {0}")]
    UnsupportedFormat(String),

    /// Requested credential type is not supported.
    #[error("unsupported_credential_type: {0}")]
    UnsupportedCredentialType(String),

    /// The server encountered an unexpected condition, such as more than one
    /// exchange record matching a code or token.
    #[error("server_error: {0}")]
    ServerError(String),
}

/// Error response body.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct OidError {
    /// Error code.
    pub error: String,

    /// Error description.
    pub error_description: String,
}

impl Error {
    /// The `OpenID` error code for the error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidGrant(_) => "invalid_grant",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidToken(_) => "invalid_token",
            Self::NotFound(_) => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidProof(_) => "invalid_proof",
            Self::UnsupportedFormat(_) => "unsupported_credential_format",
            Self::UnsupportedCredentialType(_) => "unsupported_credential_type",
            Self::ServerError(_) => "server_error",
        }
    }

    /// Human-readable description of the error.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::InvalidRequest(d)
            | Self::InvalidGrant(d)
            | Self::UnsupportedGrantType(d)
            | Self::Unauthorized(d)
            | Self::InvalidToken(d)
            | Self::NotFound(d)
            | Self::Forbidden(d)
            | Self::InvalidProof(d)
            | Self::UnsupportedFormat(d)
            | Self::UnsupportedCredentialType(d)
            | Self::ServerError(d) => d,
        }
    }

    /// Transform error to `OpenID` compatible json format.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl From<&Error> for OidError {
    fn from(err: &Error) -> Self {
        Self {
            error: err.code().to_string(),
            error_description: err.description().to_string(),
        }
    }
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OidError::from(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // Error details are returned as json.
    #[test]
    fn err_json() {
        let err = Error::InvalidRequest("bad request".into());
        assert_eq!(
            err.to_json(),
            json!({"error": "invalid_request", "error_description": "bad request"})
        );
    }

    // Descriptions containing quotes survive serialization.
    #[test]
    fn err_quoted_description() {
        let err = Error::Forbidden(r#"nonce "abc" is wrong"#.into());
        let ser = serde_json::to_value(&err).expect("should serialize");
        assert_eq!(ser["error"], "forbidden");
        assert_eq!(ser["error_description"], r#"nonce "abc" is wrong"#);
    }

    #[test]
    fn err_display() {
        let err = Error::NotFound("no exchange".into());
        assert_eq!(err.to_string(), "not_found: no exchange");
    }
}
