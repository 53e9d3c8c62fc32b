//! The model and the element kinds it contains.

use serde::Serialize;

use crate::model::{
    Children, EntityBase, EntityKind, Groupable, Relationship, impl_child_holding,
    impl_identifiable, impl_relationship_holding,
};

/// The `model { ... }` block of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Model {
    #[serde(flatten)]
    pub base: EntityBase,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    #[serde(skip_serializing_if = "Children::is_empty")]
    pub named_entities: Children,
}

/// A user of the modelled systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Person {
    #[serde(flatten)]
    pub base: EntityBase,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

/// A software system, made of containers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SoftwareSystem {
    #[serde(flatten)]
    pub base: EntityBase,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    #[serde(skip_serializing_if = "Children::is_empty")]
    pub named_entities: Children,
}

/// A deployable unit of a software system, made of components.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Container {
    #[serde(flatten)]
    pub base: EntityBase,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    #[serde(skip_serializing_if = "Children::is_empty")]
    pub named_entities: Children,
}

/// A building block inside a container.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Component {
    #[serde(flatten)]
    pub base: EntityBase,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl_identifiable!(Model, EntityKind::Model, children, relationships);
impl_identifiable!(Person, EntityKind::Person, relationships);
impl_identifiable!(SoftwareSystem, EntityKind::SoftwareSystem, children, relationships);
impl_identifiable!(Container, EntityKind::Container, children, relationships);
impl_identifiable!(Component, EntityKind::Component, relationships);

impl_child_holding!(Model);
impl_child_holding!(SoftwareSystem);
impl_child_holding!(Container);

impl_relationship_holding!(Model);
impl_relationship_holding!(Person);
impl_relationship_holding!(SoftwareSystem);
impl_relationship_holding!(Container);
impl_relationship_holding!(Component);

impl Groupable for Person {}
impl Groupable for SoftwareSystem {}
impl Groupable for Container {}
impl Groupable for Component {}
