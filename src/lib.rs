//! An API for the pre-authorized code flow of [OpenID for Verifiable Credential
//! Issuance].
//!
//! # [OpenID for Verifiable Credential Issuance]
//!
//! This library implements the issuer side of the Pre-Authorized Code Flow.
//! A Credential Issuer prepares an exchange record holding the claims to be
//! issued, offers it to a Wallet as a one-time pre-authorized code, and later
//! issues a signed Verifiable Credential bound to the key the Wallet proves
//! possession of.
//!
//! The binding chain is:
//!
//! - a pre-authorized code maps to exactly one exchange record and can be
//!   exchanged for an access token only once;
//! - each access token carries a single-use `c_nonce`;
//! - a Credential Request must include a proof of possession, signed by the
//!   Wallet's key, echoing that `c_nonce`;
//! - the issued credential's subject is bound to the key that signed the
//!   proof.
//!
//! # Design
//!
//! **Endpoints**
//!
//! The library is architected around the [OpenID4VCI] endpoints, each with its
//! own `XxxRequest` and `XxxResponse` types. The types serialize to and from
//! JSON (or form data in the case of the token request), in accordance with
//! the `OpenID4VCI` draft.
//!
//! Requests are dispatched through [`endpoint::handle`], which performs
//! validation common to all requests before handing over to the
//! request-specific handler.
//!
//! **Providers**
//!
//! Implementers supply a [`provider::Provider`] responsible for externals such
//! as exchange record storage, the supported credential catalog, and key
//! custody. See the `test-utils` crate for an in-memory implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! #[tokio::main]
//! async fn main() {
//!     let state = AppState { endpoint: "https://issuer.example".into(), provider: Provider::new() };
//!
//!     let router = Router::new()
//!         .route("/token", post(token))
//!         .route("/draft-13/credential", post(credential))
//!         .with_state(state);
//!
//!     let listener = TcpListener::bind("0.0.0.0:8080").await.expect("should bind");
//!     axum::serve(listener, router).await.expect("server should run");
//! }
//!
//! async fn token(
//!     State(state): State<AppState>, Form(req): Form<TokenRequest>,
//! ) -> AxResult<TokenResponse> {
//!     endpoint::handle(&state.endpoint, req, &state.provider).await.into()
//! }
//! ```
//!
//! [OpenID for Verifiable Credential Issuance]: (https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html)
//! [OpenID4VCI]: (https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html)

pub mod assembler;
pub mod auth;
pub mod core;
pub mod did;
pub mod endpoint;
mod error;
mod handlers;
pub mod jose;
pub mod proof;
pub mod provider;
pub mod state;
pub mod types;
pub mod vc;

pub use error::Error;
pub use handlers::{
    create_exchange, create_supported, credential, credential_offer, list_exchanges,
    list_supported, metadata, remove_exchange, remove_supported, token,
};

pub use crate::types::*;

/// Result type for the pre-authorized code exchange.
pub type Result<T, E = Error> = std::result::Result<T, E>;
