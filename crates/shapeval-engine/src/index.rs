//! # Validator Index
//!
//! Exactly one [`ShapeValidator`] per shape id, built in two phases:
//!
//! 1. **Create**: a validator for every shape in the model, chosen from the
//!    shape's kind. Kinds that cannot describe a value get the invalid-kind
//!    sentinel; construction never fails.
//! 2. **Resolve**: every validator looks up the validators of its children
//!    by shape id. All validators exist by now, so cycles in the shape graph
//!    need no special handling.
//!
//! The index built with the built-in plugins is cached on the model through
//! [`Model::knowledge`], which publishes it only once both phases have
//! completed and builds it at most once under concurrent first access.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use shapeval_model::{KnowledgeIndex, Model, Node, ShapeId};

use crate::context::ValidationContext;
use crate::error::EngineError;
use crate::event::ValidationEvent;
use crate::plugin::PluginRegistry;
use crate::validator::{ShapeValidator, Walk};

/// The per-model collection of validators.
#[derive(Debug)]
pub struct ValidatorIndex {
    validators: IndexMap<ShapeId, ShapeValidator>,
    plugins: Arc<PluginRegistry>,
}

impl KnowledgeIndex for ValidatorIndex {
    fn build(model: &Model) -> Self {
        Self::build_with(model, PluginRegistry::builtin())
    }
}

impl ValidatorIndex {
    /// The model's cached index, using the built-in plugins.
    pub fn of(model: &Model) -> Arc<Self> {
        model.knowledge::<Self>()
    }

    /// Build an uncached index that runs `plugins` instead of the built-in
    /// registry.
    pub fn with_plugins(model: &Model, plugins: Arc<PluginRegistry>) -> Self {
        Self::build_with(model, plugins)
    }

    fn build_with(model: &Model, plugins: Arc<PluginRegistry>) -> Self {
        let mut validators: IndexMap<ShapeId, ShapeValidator> = model
            .shapes()
            .map(|shape| {
                let applicable = plugins.applicable(model, shape);
                (shape.id().clone(), ShapeValidator::create(model, shape, applicable))
            })
            .collect();
        tracing::debug!(validators = validators.len(), "created shape validators");

        let positions: HashMap<ShapeId, usize> = validators
            .keys()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        for validator in validators.values_mut() {
            validator.resolve(|id| positions.get(id).copied());
        }

        for validator in validators.values() {
            for child in validator.dangling() {
                tracing::warn!(
                    shape = %validator.shape().id(),
                    child = %child,
                    "child shape is not in the model; it will not be validated"
                );
            }
        }
        tracing::debug!(validators = validators.len(), "resolved shape validators");

        Self { validators, plugins }
    }

    /// The validator for `id`.
    pub fn get(&self, id: &ShapeId) -> Option<&ShapeValidator> {
        self.validators.get(id)
    }

    pub(crate) fn validator_at(&self, position: usize) -> Option<&ShapeValidator> {
        self.validators.get_index(position).map(|(_, v)| v)
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validate `value` against the shape `shape_id`.
    ///
    /// `model` must be the model this index was built from. `ctx` should be
    /// fresh for every call; its path is back where it started on return.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownShape` if `shape_id` is not in the
    /// model. Mismatches between the value and the shape are returned as
    /// events, never as errors.
    pub fn validate(
        &self,
        model: &Model,
        shape_id: &ShapeId,
        value: &Node,
        ctx: &mut ValidationContext,
    ) -> Result<Vec<ValidationEvent>, EngineError> {
        let validator = self
            .get(shape_id)
            .ok_or_else(|| EngineError::UnknownShape(shape_id.clone()))?;
        Ok(validator.validate(&Walk::new(model, self), value, ctx))
    }
}
