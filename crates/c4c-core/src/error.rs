//! Errors raised while building the entity model.

use thiserror::Error;

use crate::{identifier::IdentifierString, model::EntityKind};

/// Error type for entity model construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A child with the same identifier already exists in the parent scope.
    #[error("redefining identifier {0}")]
    RedefiningIdentifier(IdentifierString),

    /// The text is not a legal declared identifier.
    #[error("invalid identifier `{0}`: identifiers use letters, `-` and `_`, and may not start or end with `-` or `_`")]
    InvalidIdentifier(String),

    /// A child entity was inserted before an identifier was assigned to it.
    #[error("{0} has no identifier")]
    MissingIdentifier(EntityKind),
}
