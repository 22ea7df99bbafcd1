//! # JSON Object Signing and Encryption
//!
//! Compact JWS support for access tokens, proofs of possession, and issued
//! credentials. Only `EdDSA` over Ed25519 is supported, with verification keys
//! dereferenced from `did:key` identifiers.

pub mod jws;

pub use jws::{Algorithm, Header, Jwt, Type};
