//! # Issuer HTTP Surface
//!
//! Axum router exposing the pre-authorized code exchange endpoints along with
//! the administrative endpoints used to prepare exchanges.

use std::env;
use std::sync::Arc;

use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Form, Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::Level;
use vercre_exchange::{auth, endpoint};
use vercre_exchange::provider::Provider;
use vercre_exchange::state::ExchangeRecord;
use vercre_exchange::{
    CreateExchangeRequest, CreateSupportedRequest, CredentialOffer, CredentialOfferRequest,
    CredentialRequest, CredentialResponse, Error, ListExchangesRequest, ListResponse,
    ListSupportedRequest, MetadataRequest, MetadataResponse, RemoveExchangeRequest,
    RemoveSupportedRequest, SupportedCredential, TokenRequest, TokenResponse,
};

/// Server configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Externally reachable base URL. Used as the Credential Issuer
    /// identifier.
    pub endpoint: String,

    /// Interface to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Maximum tracing level.
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".into(),
            host: "0.0.0.0".into(),
            port: 8080,
            log_level: Level::ERROR,
        }
    }
}

impl Config {
    /// Build configuration from `OID4VCI_*` environment variables, falling
    /// back to defaults for any that are unset or invalid.
    #[must_use]
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            endpoint: env::var("OID4VCI_ENDPOINT").unwrap_or(default.endpoint),
            host: env::var("OID4VCI_HOST").unwrap_or(default.host),
            port: env::var("OID4VCI_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(default.port),
            log_level: env::var("OID4VCI_LOG_LEVEL")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(default.log_level),
        }
    }

    /// Socket address to bind to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState<P> {
    config: Arc<Config>,
    provider: P,
}

/// Build the issuer router.
pub fn router<P: Provider + 'static>(config: Config, provider: P) -> Router {
    let cors = CorsLayer::new().allow_methods(Any).allow_origin(Any).allow_headers(Any);

    let state = AppState {
        config: Arc::new(config),
        provider,
    };

    Router::new()
        .route("/.well-known/openid-credential-issuer", get(metadata::<P>))
        .route("/draft-13/credential", post(credential::<P>))
        .route("/draft-11/credential", post(credential::<P>))
        .route("/token", post(token::<P>))
        .route("/oid4vci/credential-supported/create", post(create_supported::<P>))
        .route("/oid4vci/credential-supported/records", get(list_supported::<P>))
        .route("/oid4vci/credential-supported/records/:id", delete(remove_supported::<P>))
        .route("/oid4vci/exchange/create", post(create_exchange::<P>))
        .route("/oid4vci/exchange/records", get(list_exchanges::<P>))
        .route("/oid4vci/exchange/records/:id", delete(remove_exchange::<P>))
        .route("/oid4vci/credential-offer", get(credential_offer::<P>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store"),
        ))
        .with_state(state)
}

// Metadata endpoint
async fn metadata<P: Provider>(State(state): State<AppState<P>>) -> AxResult<MetadataResponse> {
    endpoint::handle(&state.config.endpoint, MetadataRequest {}, &state.provider).await.into()
}

/// Credential endpoint
///
/// The raw `Authorization` header is passed through so the library can
/// report a missing or malformed header as `unauthorized`. The header is
/// checked before an unreadable body is reported.
async fn credential<P: Provider>(
    State(state): State<AppState<P>>, headers: HeaderMap,
    body: Result<Json<CredentialRequest>, JsonRejection>,
) -> AxResult<CredentialResponse> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let mut req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let endpoint = &state.config.endpoint;
            if let Err(e) = auth::authenticate(authorization.as_deref(), endpoint, &state.provider) {
                return AxResult(Err(e));
            }
            return AxResult(Err(Error::InvalidRequest(rejection.body_text())));
        }
    };
    req.authorization = authorization;
    endpoint::handle(&state.config.endpoint, req, &state.provider).await.into()
}

/// Token endpoint
/// RFC 6749: https://tools.ietf.org/html/rfc6749#section-5.1
///
/// The authorization server MUST include the HTTP "Cache-Control" response header
/// field [RFC2616] with a value of "no-store" in any response containing tokens,
/// credentials, or other sensitive information.
///
/// [RFC2616]: (https://www.rfc-editor.org/rfc/rfc2616)
async fn token<P: Provider>(
    State(state): State<AppState<P>>, body: Result<Form<TokenRequest>, FormRejection>,
) -> AxResult<TokenResponse> {
    let req = match body {
        Ok(Form(req)) => req,
        Err(rejection) => return AxResult(Err(Error::InvalidRequest(rejection.body_text()))),
    };
    endpoint::handle(&state.config.endpoint, req, &state.provider).await.into()
}

async fn create_supported<P: Provider>(
    State(state): State<AppState<P>>, body: Result<Json<SupportedCredential>, JsonRejection>,
) -> AxResult<SupportedCredential> {
    let supported = match body {
        Ok(Json(supported)) => supported,
        Err(rejection) => return AxResult(Err(Error::InvalidRequest(rejection.body_text()))),
    };
    let req = CreateSupportedRequest { supported };
    endpoint::handle(&state.config.endpoint, req, &state.provider).await.into()
}

async fn list_supported<P: Provider>(
    State(state): State<AppState<P>>,
) -> AxResult<ListResponse<SupportedCredential>> {
    endpoint::handle(&state.config.endpoint, ListSupportedRequest {}, &state.provider).await.into()
}

async fn remove_supported<P: Provider>(
    State(state): State<AppState<P>>, Path(supported_cred_id): Path<String>,
) -> AxResult<SupportedCredential> {
    let req = RemoveSupportedRequest { supported_cred_id };
    endpoint::handle(&state.config.endpoint, req, &state.provider).await.into()
}

async fn create_exchange<P: Provider>(
    State(state): State<AppState<P>>, body: Result<Json<CreateExchangeRequest>, JsonRejection>,
) -> AxResult<ExchangeRecord> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return AxResult(Err(Error::InvalidRequest(rejection.body_text()))),
    };
    endpoint::handle(&state.config.endpoint, req, &state.provider).await.into()
}

async fn list_exchanges<P: Provider>(
    State(state): State<AppState<P>>, query: Result<Query<ListExchangesRequest>, QueryRejection>,
) -> AxResult<ListResponse<ExchangeRecord>> {
    let req = match query {
        Ok(Query(req)) => req,
        Err(rejection) => return AxResult(Err(Error::InvalidRequest(rejection.body_text()))),
    };
    endpoint::handle(&state.config.endpoint, req, &state.provider).await.into()
}

async fn remove_exchange<P: Provider>(
    State(state): State<AppState<P>>, Path(exchange_id): Path<String>,
) -> AxResult<ExchangeRecord> {
    let req = RemoveExchangeRequest { exchange_id };
    endpoint::handle(&state.config.endpoint, req, &state.provider).await.into()
}

async fn credential_offer<P: Provider>(
    State(state): State<AppState<P>>, query: Result<Query<CredentialOfferRequest>, QueryRejection>,
) -> AxResult<CredentialOffer> {
    let req = match query {
        Ok(Query(req)) => req,
        Err(rejection) => return AxResult(Err(Error::InvalidRequest(rejection.body_text()))),
    };
    endpoint::handle(&state.config.endpoint, req, &state.provider).await.into()
}

// ----------------------------------------------------------------------------
// Axum Response
// ----------------------------------------------------------------------------

/// Wrapper for `axum::Response`
pub struct AxResult<T>(vercre_exchange::Result<T>);

impl<T> IntoResponse for AxResult<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match self.0 {
            Ok(v) => (StatusCode::OK, Json(json!(v))),
            Err(e) => {
                tracing::debug!("request failed: {e}");
                (status(&e), Json(e.to_json()))
            }
        }
        .into_response()
    }
}

impl<T> From<vercre_exchange::Result<T>> for AxResult<T> {
    fn from(val: vercre_exchange::Result<T>) -> Self {
        Self(val)
    }
}

const fn status(err: &Error) -> StatusCode {
    match err {
        Error::InvalidRequest(_)
        | Error::InvalidGrant(_)
        | Error::UnsupportedGrantType(_)
        | Error::InvalidProof(_)
        | Error::UnsupportedFormat(_)
        | Error::UnsupportedCredentialType(_) => StatusCode::BAD_REQUEST,
        Error::Unauthorized(_) | Error::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        Error::Forbidden(_) => StatusCode::FORBIDDEN,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
