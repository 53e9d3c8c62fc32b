//! Registry of named child entities.

use indexmap::{IndexMap, map::Entry};
use serde::Serialize;

use crate::{
    error::ModelError,
    identifier::IdentifierString,
    model::{Entity, Identifiable},
};

/// Child entities keyed by identifier, unique within one parent scope.
///
/// Iteration follows insertion order, which keeps serialized output stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Children(IndexMap<IdentifierString, Entity>);

impl Children {
    /// Inserts `child` under its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingIdentifier`] if no identifier was
    /// assigned, or [`ModelError::RedefiningIdentifier`] if the identifier is
    /// already taken in this scope.
    pub fn insert(&mut self, child: Entity) -> Result<(), ModelError> {
        let id = child
            .id()
            .ok_or_else(|| ModelError::MissingIdentifier(child.kind()))?;
        match self.0.entry(id) {
            Entry::Occupied(_) => Err(ModelError::RedefiningIdentifier(id)),
            Entry::Vacant(slot) => {
                slot.insert(child);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &IdentifierString) -> Option<&Entity> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &IdentifierString) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IdentifierString, &Entity)> {
        self.0.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &IdentifierString> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Entity> {
        self.0.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.0.values_mut()
    }

    /// Depth-first search for `id` in this registry and every descendant.
    pub fn find(&self, id: &IdentifierString) -> Option<&Entity> {
        if let Some(found) = self.0.get(id) {
            return Some(found);
        }
        self.0
            .values()
            .filter_map(Entity::children)
            .find_map(|children| children.find(id))
    }
}
