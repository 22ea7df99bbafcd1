//! # Exchange Types
//!
//! Request and response types for the issuer endpoints, together with the
//! supported credential catalog entry.

mod credential;
mod exchange;
mod metadata;
mod offer;
mod supported;
mod token;

pub use credential::*;
pub use exchange::*;
pub use metadata::*;
pub use offer::*;
pub use supported::*;
pub use token::*;

/// The only credential format this library issues.
pub const JWT_VC_JSON: &str = "jwt_vc_json";
