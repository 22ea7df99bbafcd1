pub mod catalog;
pub mod exchange;
pub mod keystore;
