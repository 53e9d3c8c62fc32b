//! The workspace root entity.

use log::trace;
use serde::Serialize;

use crate::{
    identifier::IdentifierString,
    model::{
        Children, Entity, EntityBase, EntityKind, Identifiable, Model, Relationship,
        impl_identifiable,
    },
};

/// Placeholder for a workspace's `views` block, which has no grammar yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Views {}

/// The root of a parsed source tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workspace {
    #[serde(flatten)]
    pub base: EntityBase,

    /// Path of a parent workspace this one extends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Name of the source file the workspace was declared in.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<Views>,
}

impl_identifiable!(Workspace, EntityKind::Workspace);

impl Workspace {
    /// Looks up an entity anywhere in the model by identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use c4c_core::{
    ///     identifier::IdentifierString,
    ///     model::{ChildHolding, Entity, Identifiable, Model, Person, Workspace},
    /// };
    ///
    /// let mut person = Person::default();
    /// person.set_id(IdentifierString::new("user").unwrap());
    ///
    /// let mut model = Model::default();
    /// model.add_child(Entity::from(person)).unwrap();
    ///
    /// let workspace = Workspace { model: Some(model), ..Workspace::default() };
    /// assert!(workspace.find(&IdentifierString::new("user").unwrap()).is_some());
    /// ```
    pub fn find(&self, id: &IdentifierString) -> Option<&Entity> {
        self.model.as_ref()?.named_entities.find(id)
    }

    /// Follows `path` down from the model, one child scope per identifier.
    ///
    /// Returns `None` for an empty path or one that leaves the tree.
    pub fn resolve(&self, path: &[IdentifierString]) -> Option<&Entity> {
        let (first, rest) = path.split_first()?;
        let mut entity = self.model.as_ref()?.named_entities.get(first)?;
        for id in rest {
            entity = entity.children()?.get(id)?;
        }
        Some(entity)
    }

    /// The entity that owns `entity`, resolved through its parent path.
    ///
    /// Returns `None` when the workspace itself is the owner.
    pub fn parent_of(&self, entity: &impl Identifiable) -> Option<&Entity> {
        self.resolve(&entity.base().parent_path)
    }

    /// Points every entity's `parent` at its nearest identified ancestor and
    /// records the path to that ancestor.
    ///
    /// Children of the model belong to the workspace, since the model itself
    /// carries no identifier. Relationships belong to the entity whose body
    /// declared them.
    pub fn link_parents(&mut self) {
        let root = self.id();
        if let Some(model) = self.model.as_mut() {
            model.base.parent = root;
            link_relationships(&mut model.relationships, root, &[]);
            link_children(&mut model.named_entities, root, &[]);
        }
    }
}

fn link_relationships(
    relationships: &mut [Relationship],
    owner: Option<IdentifierString>,
    path: &[IdentifierString],
) {
    for relationship in relationships {
        relationship.base.parent = owner;
        relationship.base.parent_path = path.to_vec();
    }
}

fn link_children(
    children: &mut Children,
    parent: Option<IdentifierString>,
    path: &[IdentifierString],
) {
    for child in children.values_mut() {
        let base = child.base_mut();
        base.parent = parent;
        base.parent_path = path.to_vec();

        let (own_id, own_path) = match child.id() {
            Some(id) => (Some(id), [path, &[id]].concat()),
            None => (parent, path.to_vec()),
        };
        trace!(child:? = child.id(), parent:? = parent; "Linking parent");
        if let Some(relationships) = child.relationships_mut() {
            link_relationships(relationships, own_id, &own_path);
        }
        if let Some(grandchildren) = child.children_mut() {
            link_children(grandchildren, own_id, &own_path);
        }
    }
}
