//! Directed relationships between entities.

use serde::Serialize;

use crate::{
    identifier::IdentifierString,
    model::{EntityBase, EntityKind, impl_identifiable},
};

/// A directed edge `source -> destination`.
///
/// The source of a relationship declared as `-> dest` or `this -> dest` is
/// the literal identifier `this`, resolved against the enclosing entity
/// during reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    #[serde(flatten)]
    pub base: EntityBase,

    pub source_id: IdentifierString,

    pub destination_id: IdentifierString,

    /// Index of the relationship this one was derived from, within the same
    /// owner's relationship list. Reserved for implied relationships.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implied_based_on: Option<usize>,
}

impl Relationship {
    pub fn new(source_id: IdentifierString, destination_id: IdentifierString) -> Self {
        Self {
            base: EntityBase::default(),
            source_id,
            destination_id,
            implied_based_on: None,
        }
    }
}

impl_identifiable!(Relationship, EntityKind::Relationship);
