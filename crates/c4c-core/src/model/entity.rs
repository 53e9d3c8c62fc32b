//! Shared entity attributes, the [`Entity`] variant set and capability traits.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    error::ModelError,
    identifier::IdentifierString,
    model::{
        Children, Component, Container, Model, Person, Relationship, SoftwareSystem, Workspace,
    },
};

/// The kind of an entity, also used as the tag of synthetic identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Workspace,
    Model,
    Person,
    SoftwareSystem,
    Container,
    Component,
    Relationship,
}

impl EntityKind {
    /// Returns the lower-case kind name, e.g. `"softwaresystem"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Workspace => "workspace",
            EntityKind::Model => "model",
            EntityKind::Person => "person",
            EntityKind::SoftwareSystem => "softwaresystem",
            EntityKind::Container => "container",
            EntityKind::Component => "component",
            EntityKind::Relationship => "relationship",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes shared by every entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityBase {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub perspectives: IndexMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub technology: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<IdentifierString>,

    /// Set by cross-workspace reconciliation. Takes precedence over `local_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_id: Option<IdentifierString>,

    /// Identifier of the nearest identified ancestor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<IdentifierString>,

    /// Identifiers leading from the model down to the owning entity,
    /// outermost first. Empty when the workspace owns this entity.
    ///
    /// Local identifiers repeat across scopes, so only the full path names
    /// the owner. See [`Workspace::parent_of`].
    #[serde(skip)]
    pub parent_path: Vec<IdentifierString>,
}

/// An entity with identity.
pub trait Identifiable {
    fn kind(&self) -> EntityKind;

    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    /// The resolved identifier: the fully qualified one when reconciled,
    /// otherwise the local one.
    fn id(&self) -> Option<IdentifierString> {
        let base = self.base();
        base.fully_qualified_id.or(base.local_id)
    }

    fn set_id(&mut self, id: IdentifierString) {
        self.base_mut().local_id = Some(id);
    }

    /// This entity as a child holder, if it can own children.
    fn as_child_holding_mut(&mut self) -> Option<&mut dyn ChildHolding> {
        None
    }

    /// This entity as a relationship holder, if it can own relationships.
    fn as_relationship_holding_mut(&mut self) -> Option<&mut dyn RelationshipHolding> {
        None
    }
}

/// An entity that can be declared inside a `group` block.
pub trait Groupable: Identifiable {
    fn group(&self) -> &str {
        &self.base().group
    }

    fn set_group(&mut self, group: &str) {
        self.base_mut().group = group.to_string();
    }
}

/// An entity that owns named child entities.
pub trait ChildHolding {
    fn children(&self) -> &Children;

    fn children_mut(&mut self) -> &mut Children;

    /// Inserts a child under its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::RedefiningIdentifier`] if the identifier is
    /// already used in this scope.
    fn add_child(&mut self, child: Entity) -> Result<(), ModelError> {
        self.children_mut().insert(child)
    }
}

/// An entity that owns relationships, kept in declaration order.
pub trait RelationshipHolding {
    fn relationships(&self) -> &[Relationship];

    fn relationships_mut(&mut self) -> &mut Vec<Relationship>;

    fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships_mut().push(relationship);
    }
}

/// Any node of the entity tree.
///
/// Serializes as the wrapped entity with no variant tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Workspace(Workspace),
    Model(Model),
    Person(Person),
    SoftwareSystem(SoftwareSystem),
    Container(Container),
    Component(Component),
    Relationship(Relationship),
}

impl Entity {
    /// Children of this entity, if it can hold any.
    pub fn children(&self) -> Option<&Children> {
        match self {
            Entity::Model(e) => Some(e.children()),
            Entity::SoftwareSystem(e) => Some(e.children()),
            Entity::Container(e) => Some(e.children()),
            Entity::Workspace(_)
            | Entity::Person(_)
            | Entity::Component(_)
            | Entity::Relationship(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Children> {
        self.as_child_holding_mut().map(ChildHolding::children_mut)
    }

    /// Relationships declared in this entity's body, if it can hold any.
    pub fn relationships(&self) -> Option<&[Relationship]> {
        match self {
            Entity::Model(e) => Some(e.relationships()),
            Entity::Person(e) => Some(e.relationships()),
            Entity::SoftwareSystem(e) => Some(e.relationships()),
            Entity::Container(e) => Some(e.relationships()),
            Entity::Component(e) => Some(e.relationships()),
            Entity::Workspace(_) | Entity::Relationship(_) => None,
        }
    }

    pub fn relationships_mut(&mut self) -> Option<&mut Vec<Relationship>> {
        self.as_relationship_holding_mut()
            .map(RelationshipHolding::relationships_mut)
    }

    /// Writes `group` onto entities that can be grouped. Other kinds are left untouched.
    pub fn set_group(&mut self, group: &str) {
        match self {
            Entity::Person(e) => e.set_group(group),
            Entity::SoftwareSystem(e) => e.set_group(group),
            Entity::Container(e) => e.set_group(group),
            Entity::Component(e) => e.set_group(group),
            Entity::Workspace(_) | Entity::Model(_) | Entity::Relationship(_) => {}
        }
    }
}

impl Identifiable for Entity {
    fn kind(&self) -> EntityKind {
        match self {
            Entity::Workspace(e) => e.kind(),
            Entity::Model(e) => e.kind(),
            Entity::Person(e) => e.kind(),
            Entity::SoftwareSystem(e) => e.kind(),
            Entity::Container(e) => e.kind(),
            Entity::Component(e) => e.kind(),
            Entity::Relationship(e) => e.kind(),
        }
    }

    fn base(&self) -> &EntityBase {
        match self {
            Entity::Workspace(e) => e.base(),
            Entity::Model(e) => e.base(),
            Entity::Person(e) => e.base(),
            Entity::SoftwareSystem(e) => e.base(),
            Entity::Container(e) => e.base(),
            Entity::Component(e) => e.base(),
            Entity::Relationship(e) => e.base(),
        }
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        match self {
            Entity::Workspace(e) => e.base_mut(),
            Entity::Model(e) => e.base_mut(),
            Entity::Person(e) => e.base_mut(),
            Entity::SoftwareSystem(e) => e.base_mut(),
            Entity::Container(e) => e.base_mut(),
            Entity::Component(e) => e.base_mut(),
            Entity::Relationship(e) => e.base_mut(),
        }
    }

    fn as_child_holding_mut(&mut self) -> Option<&mut dyn ChildHolding> {
        match self {
            Entity::Workspace(e) => e.as_child_holding_mut(),
            Entity::Model(e) => e.as_child_holding_mut(),
            Entity::Person(e) => e.as_child_holding_mut(),
            Entity::SoftwareSystem(e) => e.as_child_holding_mut(),
            Entity::Container(e) => e.as_child_holding_mut(),
            Entity::Component(e) => e.as_child_holding_mut(),
            Entity::Relationship(e) => e.as_child_holding_mut(),
        }
    }

    fn as_relationship_holding_mut(&mut self) -> Option<&mut dyn RelationshipHolding> {
        match self {
            Entity::Workspace(e) => e.as_relationship_holding_mut(),
            Entity::Model(e) => e.as_relationship_holding_mut(),
            Entity::Person(e) => e.as_relationship_holding_mut(),
            Entity::SoftwareSystem(e) => e.as_relationship_holding_mut(),
            Entity::Container(e) => e.as_relationship_holding_mut(),
            Entity::Component(e) => e.as_relationship_holding_mut(),
            Entity::Relationship(e) => e.as_relationship_holding_mut(),
        }
    }
}

impl From<Person> for Entity {
    fn from(person: Person) -> Self {
        Entity::Person(person)
    }
}

impl From<SoftwareSystem> for Entity {
    fn from(system: SoftwareSystem) -> Self {
        Entity::SoftwareSystem(system)
    }
}

impl From<Container> for Entity {
    fn from(container: Container) -> Self {
        Entity::Container(container)
    }
}

impl From<Component> for Entity {
    fn from(component: Component) -> Self {
        Entity::Component(component)
    }
}
