//! # Model
//!
//! The [`Model`] is an immutable arena of shapes addressed by [`ShapeId`],
//! plus model metadata and the per-model knowledge cache. Reference cycles
//! through member targets are legal and common (recursive structures).
//!
//! Models are assembled with [`ModelBuilder`], which creates member shapes
//! for every aggregate it is given and merges the prelude, or loaded from a
//! JSON AST document via [`crate::ast`].

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::ModelError;
use crate::knowledge::{KnowledgeCache, KnowledgeIndex};
use crate::node::Node;
use crate::prelude;
use crate::shape::{MemberShape, Shape, ShapeKind, ShapeType};
use crate::shape_id::ShapeId;
use crate::traits::Traits;

/// An immutable, possibly cyclic shape graph.
#[derive(Debug)]
pub struct Model {
    shapes: IndexMap<ShapeId, Shape>,
    metadata: IndexMap<String, Node>,
    knowledge: KnowledgeCache,
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    pub fn get_shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn contains_shape(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Every shape, in registration order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn shape_ids(&self) -> impl Iterator<Item = &ShapeId> {
        self.shapes.keys()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Shapes that carry `trait_id`.
    pub fn shapes_with_trait<'a>(&'a self, trait_id: &'a str) -> impl Iterator<Item = &'a Shape> {
        self.shapes.values().filter(move |s| s.has_trait(trait_id))
    }

    pub fn metadata(&self, key: &str) -> Option<&Node> {
        self.metadata.get(key)
    }

    /// Returns the cached index of type `T`, building it on first use.
    ///
    /// Concurrent first calls build the index once; every caller receives
    /// the same fully constructed instance.
    pub fn knowledge<T: KnowledgeIndex>(&self) -> Arc<T> {
        self.knowledge.get_or_build::<T>(self)
    }
}

/// A member declared through [`ModelBuilder`].
#[derive(Debug, Clone)]
pub struct MemberDef {
    name: String,
    target: String,
    traits: Traits,
}

impl MemberDef {
    pub fn new(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            traits: Traits::default(),
        }
    }

    /// Mark the member `required`.
    pub fn required(self) -> Self {
        self.with_trait(prelude::REQUIRED, Node::object(IndexMap::new()))
    }

    pub fn with_trait(mut self, trait_id: &str, value: Node) -> Self {
        self.traits.insert(trait_id, value);
        self
    }
}

/// Assembles a [`Model`]. Errors are collected and reported by
/// [`ModelBuilder::build`], so calls can be chained.
#[derive(Debug)]
pub struct ModelBuilder {
    shapes: IndexMap<ShapeId, Shape>,
    pending_traits: Vec<(String, String, Node)>,
    metadata: IndexMap<String, Node>,
    errors: Vec<ModelError>,
    include_prelude: bool,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self {
            shapes: IndexMap::new(),
            pending_traits: Vec::new(),
            metadata: IndexMap::new(),
            errors: Vec::new(),
            include_prelude: true,
        }
    }
}

impl ModelBuilder {
    /// Register a fully formed shape. Aggregates added this way must have
    /// their member shapes added too.
    pub fn add_shape(mut self, shape: Shape) -> Self {
        self.insert(shape);
        self
    }

    /// Register a shape whose kind has no children (`string`, `byte`, ...).
    pub fn simple(mut self, id: &str, shape_type: ShapeType) -> Self {
        let Some(id) = self.parse_id(id) else {
            return self;
        };
        match ShapeKind::simple(shape_type) {
            Some(kind) => self.insert(Shape::new(id, kind)),
            None => self.errors.push(ModelError::MalformedAst {
                path: id.to_string(),
                reason: format!("`{shape_type}` shapes need members"),
            }),
        }
        self
    }

    pub fn list(mut self, id: &str, member: MemberDef) -> Self {
        if let Some(id) = self.parse_id(id) {
            if let Some(member_id) = self.add_member(&id, member) {
                self.insert(Shape::new(id, ShapeKind::List { member: member_id }));
            }
        }
        self
    }

    pub fn map(mut self, id: &str, key: MemberDef, value: MemberDef) -> Self {
        if let Some(id) = self.parse_id(id) {
            let key = self.add_member(&id, key);
            let value = self.add_member(&id, value);
            if let (Some(key), Some(value)) = (key, value) {
                self.insert(Shape::new(id, ShapeKind::Map { key, value }));
            }
        }
        self
    }

    pub fn structure(mut self, id: &str, members: impl IntoIterator<Item = MemberDef>) -> Self {
        if let Some(id) = self.parse_id(id) {
            let members = self.add_members(&id, members);
            self.insert(Shape::new(id, ShapeKind::Structure { members }));
        }
        self
    }

    pub fn union(mut self, id: &str, members: impl IntoIterator<Item = MemberDef>) -> Self {
        if let Some(id) = self.parse_id(id) {
            let members = self.add_members(&id, members);
            self.insert(Shape::new(id, ShapeKind::Union { members }));
        }
        self
    }

    /// Apply a trait to a shape registered before or after this call.
    pub fn apply_trait(mut self, id: &str, trait_id: &str, value: Node) -> Self {
        self.pending_traits
            .push((id.to_string(), trait_id.to_string(), value));
        self
    }

    pub fn metadata(mut self, key: &str, value: Node) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Do not merge the prelude shapes.
    pub fn without_prelude(mut self) -> Self {
        self.include_prelude = false;
        self
    }

    /// Finish the model.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while building: an invalid shape id,
    /// a duplicate shape, or a trait applied to an unknown shape.
    pub fn build(mut self) -> Result<Model, ModelError> {
        if self.include_prelude {
            for shape in prelude::shapes() {
                self.shapes.entry(shape.id().clone()).or_insert(shape);
            }
        }

        for (id, trait_id, value) in std::mem::take(&mut self.pending_traits) {
            let Some(parsed) = self.parse_id(&id) else {
                continue;
            };
            match self.shapes.get_mut(&parsed) {
                Some(shape) => shape.traits_mut().insert(&trait_id, value),
                None => self
                    .errors
                    .push(ModelError::UnknownTraitTarget { shape: id, trait_id }),
            }
        }

        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        tracing::debug!(shapes = self.shapes.len(), "model assembled");
        Ok(Model {
            shapes: self.shapes,
            metadata: self.metadata,
            knowledge: KnowledgeCache::default(),
        })
    }

    fn parse_id(&mut self, id: &str) -> Option<ShapeId> {
        match id.parse() {
            Ok(id) => Some(id),
            Err(err) => {
                self.errors.push(err);
                None
            }
        }
    }

    fn insert(&mut self, shape: Shape) {
        if self.shapes.contains_key(shape.id()) {
            self.errors
                .push(ModelError::DuplicateShape(shape.id().to_string()));
            return;
        }
        self.shapes.insert(shape.id().clone(), shape);
    }

    fn add_member(&mut self, container: &ShapeId, def: MemberDef) -> Option<ShapeId> {
        let member_id = match container.with_member(&def.name) {
            Ok(id) => id,
            Err(err) => {
                self.errors.push(err);
                return None;
            }
        };
        let target = self.parse_id(&def.target)?;
        let shape = Shape::new(
            member_id.clone(),
            ShapeKind::Member(MemberShape {
                container: container.clone(),
                target,
                name: def.name,
            }),
        )
        .with_traits(def.traits);
        self.insert(shape);
        Some(member_id)
    }

    fn add_members(
        &mut self,
        container: &ShapeId,
        members: impl IntoIterator<Item = MemberDef>,
    ) -> IndexMap<String, ShapeId> {
        members
            .into_iter()
            .filter_map(|def| {
                let name = def.name.clone();
                self.add_member(container, def).map(|id| (name, id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_creates_member_shapes() {
        let model = Model::builder()
            .structure(
                "ns#Person",
                [
                    MemberDef::new("name", "smithy.api#String").required(),
                    MemberDef::new("friends", "ns#People"),
                ],
            )
            .list("ns#People", MemberDef::new("member", "ns#Person"))
            .build()
            .unwrap();

        let name: ShapeId = "ns#Person$name".parse().unwrap();
        let member = model.get_shape(&name).unwrap();
        assert!(member.is_required());
        assert_eq!(member.as_member().unwrap().container.to_string(), "ns#Person");

        let list_member: ShapeId = "ns#People$member".parse().unwrap();
        let target = &model.get_shape(&list_member).unwrap().as_member().unwrap().target;
        assert_eq!(target.to_string(), "ns#Person");
    }

    #[test]
    fn test_builder_merges_prelude() {
        let model = Model::builder().build().unwrap();
        let string: ShapeId = "smithy.api#String".parse().unwrap();
        assert!(model.contains_shape(&string));

        let bare = Model::builder().without_prelude().build().unwrap();
        assert_eq!(bare.shape_count(), 0);
    }

    #[test]
    fn test_builder_reports_duplicates() {
        let err = Model::builder()
            .simple("ns#A", ShapeType::String)
            .simple("ns#A", ShapeType::Integer)
            .build()
            .unwrap_err();
        assert_eq!(err, ModelError::DuplicateShape("ns#A".to_string()));
    }

    #[test]
    fn test_builder_reports_invalid_ids() {
        let err = Model::builder()
            .simple("no-namespace", ShapeType::String)
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidShapeId { .. }));
    }

    #[test]
    fn test_apply_trait_after_registration() {
        let model = Model::builder()
            .apply_trait("ns#Small", prelude::RANGE, Node::from(json!({"max": 3})))
            .simple("ns#Small", ShapeType::Integer)
            .build()
            .unwrap();
        let id: ShapeId = "ns#Small".parse().unwrap();
        assert!(model.get_shape(&id).unwrap().has_trait(prelude::RANGE));
        assert_eq!(model.shapes_with_trait(prelude::RANGE).count(), 1);
    }

    #[test]
    fn test_apply_trait_to_unknown_shape_fails() {
        let err = Model::builder()
            .apply_trait("ns#Missing", prelude::SPARSE, Node::object(IndexMap::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownTraitTarget { .. }));
    }
}
