//! # Endpoint Handlers
//!
//! One module per endpoint. Each exposes an async handler function taking the
//! Credential Issuer identifier, a [`Provider`] and the request, and
//! implements [`Handler`](crate::endpoint::Handler) for the request type.

mod credential;
mod exchange;
mod metadata;
mod offer;
mod supported;
mod token;

pub use credential::credential;
pub use exchange::{create as create_exchange, list as list_exchanges, remove as remove_exchange};
pub use metadata::metadata;
pub use offer::credential_offer;
pub use supported::{create as create_supported, list as list_supported, remove as remove_supported};
pub use token::token;

use crate::provider::{ExchangeStore, Provider};
use crate::state::{ExchangeRecord, Filter};
use crate::{Error, Result};

// Look up the single record matching the filter. More than one match means
// a code or token has been reused and the store is inconsistent.
async fn find_one(provider: &impl Provider, filter: &Filter) -> Result<Option<ExchangeRecord>> {
    let mut records = ExchangeStore::query(provider, filter)
        .await
        .map_err(|e| Error::InvalidRequest(format!("issue querying exchange records: {e}")))?;

    if records.len() > 1 {
        tracing::warn!(count = records.len(), "duplicate exchange records for lookup");
        return Err(Error::ServerError("more than one exchange record found".into()));
    }
    Ok(records.pop())
}
