//! Core types for the c4c architecture language.
//!
//! This crate holds the pieces shared by the parser and its consumers:
//!
//! - [`position`] - source locations carried by tokens and diagnostics
//! - [`identifier`] - interned entity identifiers
//! - [`model`] - the entity tree a parse produces
//! - [`error`] - errors raised while assembling the tree

pub mod error;
pub mod identifier;
pub mod model;
pub mod position;

pub use error::ModelError;
