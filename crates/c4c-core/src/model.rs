//! The architecture entity model.
//!
//! Parsing produces a tree rooted at a [`Workspace`]. Every node shares the
//! attributes in [`EntityBase`] and opts into behavior through the capability
//! traits:
//!
//! - [`Identifiable`] - has a local and a fully qualified identifier
//! - [`Groupable`] - can be placed into a named group
//! - [`ChildHolding`] - owns a [`Children`] registry keyed by identifier
//! - [`RelationshipHolding`] - owns an ordered list of [`Relationship`]s
//!
//! Child entities refer to their parent by identifier only. The tree owns
//! every node, and [`Workspace::find`] resolves an identifier back to its
//! entity.
//!
//! # Serialized form
//!
//! All types implement [`serde::Serialize`]. Empty optional fields are
//! omitted, and the field names are a stable contract for consumers of the
//! compiled JSON.

mod children;
mod elements;
mod entity;
mod relationship;
mod workspace;

pub use children::Children;
pub use elements::{Component, Container, Model, Person, SoftwareSystem};
pub use entity::{
    ChildHolding, Entity, EntityBase, EntityKind, Groupable, Identifiable, RelationshipHolding,
};
pub use relationship::Relationship;
pub use workspace::{Views, Workspace};

/// Implements [`Identifiable`] for a struct with a `base: EntityBase` field.
///
/// Trailing `children` and `relationships` flags expose the type through
/// [`Identifiable::as_child_holding_mut`] and
/// [`Identifiable::as_relationship_holding_mut`].
macro_rules! impl_identifiable {
    ($ty:ty, $kind:expr $(, $capability:ident)*) => {
        impl $crate::model::Identifiable for $ty {
            fn kind(&self) -> $crate::model::EntityKind {
                $kind
            }

            fn base(&self) -> &$crate::model::EntityBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::model::EntityBase {
                &mut self.base
            }

            $($crate::model::impl_identifiable!(@$capability);)*
        }
    };
    (@children) => {
        fn as_child_holding_mut(&mut self) -> Option<&mut dyn $crate::model::ChildHolding> {
            Some(self)
        }
    };
    (@relationships) => {
        fn as_relationship_holding_mut(
            &mut self,
        ) -> Option<&mut dyn $crate::model::RelationshipHolding> {
            Some(self)
        }
    };
}

/// Implements [`ChildHolding`] for a struct with a `named_entities: Children` field.
macro_rules! impl_child_holding {
    ($ty:ty) => {
        impl $crate::model::ChildHolding for $ty {
            fn children(&self) -> &$crate::model::Children {
                &self.named_entities
            }

            fn children_mut(&mut self) -> &mut $crate::model::Children {
                &mut self.named_entities
            }
        }
    };
}

/// Implements [`RelationshipHolding`] for a struct with a `relationships` field.
macro_rules! impl_relationship_holding {
    ($ty:ty) => {
        impl $crate::model::RelationshipHolding for $ty {
            fn relationships(&self) -> &[$crate::model::Relationship] {
                &self.relationships
            }

            fn relationships_mut(&mut self) -> &mut Vec<$crate::model::Relationship> {
                &mut self.relationships
            }
        }
    };
}

pub(crate) use impl_child_holding;
pub(crate) use impl_identifiable;
pub(crate) use impl_relationship_holding;
