//! # Core
//!
//! Utilities shared by the exchange endpoints.

pub mod generate;
