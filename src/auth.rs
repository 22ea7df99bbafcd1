//! # Authentication Check
//!
//! Validates the bearer access token presented with a Credential Request.
//! The token must be a JWS signed by the issuer's own `did:key` identity and
//! must not have expired. No exchange state is read or changed here.

use chrono::Utc;

use crate::did;
use crate::jose::jws;
use crate::provider::{KeyOps, Signer};
use crate::types::AccessTokenClaims;
use crate::{Error, Result};

/// Authenticate the `Authorization` header, returning the bearer token.
///
/// # Errors
///
/// Returns [`Error::Unauthorized`] when the header is missing or malformed,
/// the scheme is not `Bearer`, the token's `kid` is not a `did:key`, the token
/// was not signed by the issuer, or it has expired. Returns
/// [`Error::InvalidRequest`] if the issuer's signer cannot be obtained.
pub fn authenticate(
    authorization: Option<&str>, credential_issuer: &str, keys: &impl KeyOps,
) -> Result<String> {
    tracing::debug!("auth::authenticate");

    let Some(authorization) = authorization else {
        return Err(Error::Unauthorized("missing authorization header".into()));
    };
    let Some((scheme, token)) = authorization.trim().split_once(' ') else {
        return Err(Error::Unauthorized("malformed authorization header".into()));
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(Error::Unauthorized("unsupported authorization scheme".into()));
    }
    let token = token.trim();

    let Ok(header) = jws::decode_header(token) else {
        return Err(Error::Unauthorized("access token is malformed".into()));
    };
    if !header.kid.contains("did:key:") {
        return Err(Error::Unauthorized("access token `kid` is not a did:key".into()));
    }

    let signer = keys
        .signer(credential_issuer)
        .map_err(|e| Error::InvalidRequest(format!("issue getting signer: {e}")))?;
    if header.kid != signer.verification_method() {
        tracing::warn!(kid = %header.kid, "access token not issued by this issuer");
        return Err(Error::Unauthorized("access token not issued by this issuer".into()));
    }

    let jwt = match jws::decode::<_, AccessTokenClaims>(token, did::resolve_key) {
        Ok(jwt) => jwt,
        Err(e) => {
            tracing::debug!("access token rejected: {e}");
            return Err(Error::Unauthorized("access token signature is invalid".into()));
        }
    };
    if jwt.claims.exp <= Utc::now().timestamp() {
        return Err(Error::Unauthorized("access token has expired".into()));
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer as _, SigningKey};
    use rand::rngs::OsRng;

    use super::*;
    use crate::jose::{Algorithm, Type};

    #[derive(Clone)]
    struct Keys(SigningKey);

    impl KeyOps for Keys {
        fn signer(&self, _: &str) -> anyhow::Result<impl Signer> {
            Ok(self.clone())
        }
    }

    impl Signer for Keys {
        fn algorithm(&self) -> Algorithm {
            Algorithm::EdDSA
        }

        fn verification_method(&self) -> String {
            did::verification_method(&self.0.verifying_key())
        }

        async fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
            Ok(self.0.sign(msg).to_bytes().to_vec())
        }
    }

    const ISSUER: &str = "http://vercre.io";

    fn keys() -> Keys {
        Keys(SigningKey::generate(&mut OsRng))
    }

    async fn access_token(keys: &Keys, exp_offset: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            iss: ISSUER.into(),
            sub: "exchange".into(),
            scope: "UniversityDegreeCredential".into(),
            iat: now,
            exp: now + exp_offset,
            jti: "jti".into(),
        };
        jws::encode(Type::Jwt, &claims, keys).await.expect("should encode")
    }

    #[tokio::test]
    async fn valid_token() {
        let keys = keys();
        let token = access_token(&keys, 300).await;

        let header = format!("bearer {token}");
        let authenticated = authenticate(Some(&header), ISSUER, &keys).expect("should authenticate");
        assert_eq!(authenticated, token);
    }

    #[tokio::test]
    async fn missing_or_malformed_header() {
        let keys = keys();
        let token = access_token(&keys, 300).await;

        for header in [None, Some("Bearer".to_string()), Some(format!("Basic {token}"))] {
            let err = authenticate(header.as_deref(), ISSUER, &keys).expect_err("should fail");
            assert!(matches!(err, Error::Unauthorized(_)));
        }
    }

    #[tokio::test]
    async fn foreign_key() {
        let issuer_keys = keys();
        let token = access_token(&keys(), 300).await;

        let err = authenticate(Some(&format!("Bearer {token}")), ISSUER, &issuer_keys)
            .expect_err("should fail");
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn expired_token() {
        let keys = keys();
        let token = access_token(&keys, -10).await;

        let err = authenticate(Some(&format!("Bearer {token}")), ISSUER, &keys)
            .expect_err("should fail");
        assert_eq!(err, Error::Unauthorized("access token has expired".into()));
    }

    #[derive(Clone)]
    struct NoKeys;

    impl KeyOps for NoKeys {
        fn signer(&self, _: &str) -> anyhow::Result<impl Signer> {
            Err::<Keys, _>(anyhow::anyhow!("keystore locked"))
        }
    }

    #[tokio::test]
    async fn signer_unavailable() {
        let token = access_token(&keys(), 300).await;

        let err = authenticate(Some(&format!("Bearer {token}")), ISSUER, &NoKeys)
            .expect_err("should fail");
        assert_eq!(err, Error::InvalidRequest("issue getting signer: keystore locked".into()));
    }
}
