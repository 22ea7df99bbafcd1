use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Grant type identifier for the Pre-Authorized Code Flow.
pub const PRE_AUTHORIZED_GRANT: &str = "urn:ietf:params:oauth:grant-type:pre-authorized_code";

/// A Token Request is made as defined in [RFC6749] with extensions to support
/// the Pre-Authorized Code Flow. Sent by the Wallet as form data.
///
/// [RFC6749]: (https://www.rfc-editor.org/rfc/rfc6749.html)
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenRequest {
    /// Authorization grant type. Must be
    /// `urn:ietf:params:oauth:grant-type:pre-authorized_code`.
    pub grant_type: String,

    /// The code representing the Credential Issuer's authorization for the
    /// Wallet to obtain Credentials of a certain type.
    #[serde(rename = "pre-authorized_code", alias = "pre_authorized_code")]
    pub pre_authorized_code: String,

    /// PIN sent to the End-User out of band. Required when the exchange was
    /// created with a PIN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_pin: Option<String>,
}

impl TokenRequest {
    /// Create a Token Request for the pre-authorized code.
    #[must_use]
    pub fn pre_authorized(code: impl Into<String>, user_pin: Option<String>) -> Self {
        Self {
            grant_type: PRE_AUTHORIZED_GRANT.to_string(),
            pre_authorized_code: code.into(),
            user_pin,
        }
    }
}

/// Token Response as defined in [RFC6749].
///
/// [RFC6749]: (https://www.rfc-editor.org/rfc/rfc6749.html)
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// An OAuth 2.0 Access Token that can subsequently be used to request one
    /// or more Credentials.
    pub access_token: String,

    /// The type of the token issued. Must be "`Bearer`".
    pub token_type: TokenType,

    /// The lifetime in seconds of the access token.
    pub expires_in: i64,

    /// A nonce to be used to create a proof of possession of key material when
    /// requesting a Credential.
    pub c_nonce: String,

    /// The lifetime in seconds of the `c_nonce`.
    pub c_nonce_expires_in: i64,
}

/// Access token type as defined in [RFC6749]. Per the specification, the only
/// value allowed is "`Bearer`".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TokenType {
    /// The only valid value is "`Bearer`".
    #[default]
    Bearer,
}

/// Claims carried by the signed access token.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// The Credential Issuer that minted the token.
    pub iss: String,

    /// The exchange the token was minted for.
    pub sub: String,

    /// The supported credential the token grants access to.
    pub scope: String,

    /// Issued at (Unix time).
    pub iat: i64,

    /// Expiry (Unix time).
    pub exp: i64,

    /// Unique token identifier.
    pub jti: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_field_names() {
        let req: TokenRequest = serde_json::from_value(serde_json::json!({
            "grant_type": PRE_AUTHORIZED_GRANT,
            "pre-authorized_code": "SplxlOBeZQQYbYS6WxSbIA",
        }))
        .expect("should deserialize");
        assert_eq!(req.pre_authorized_code, "SplxlOBeZQQYbYS6WxSbIA");
        assert!(req.user_pin.is_none());

        let ser = serde_json::to_value(TokenRequest::pre_authorized("abc", None))
            .expect("should serialize");
        assert_eq!(ser["pre-authorized_code"], "abc");
    }
}
