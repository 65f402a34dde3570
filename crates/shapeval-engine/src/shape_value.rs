//! # Trait-Carried Values
//!
//! Some traits carry a literal that must itself conform to the shape they
//! are applied to. The `default` trait is the one this engine knows: its
//! value is validated against the shape (or member) it decorates.
//!
//! [`ShapeValueIndex`] collects these values once per model, each with the
//! options its validation runs under. [`validate_shape_values`] runs them
//! all through the cached [`ValidatorIndex`].

use std::sync::Arc;

use indexmap::IndexMap;
use shapeval_model::{prelude, KnowledgeIndex, Model, Node, ShapeId};

use crate::context::{Feature, ValidationOptions};
use crate::event::ValidationEvent;
use crate::index::ValidatorIndex;

const DEFAULT_TRAIT_EVENT_ID: &str = "DefaultTrait";
const DEFAULT_TRAIT_CONTEXT: &str = "Error validating @default trait";

/// A value that must conform to a shape, with the options to check it by.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeValue {
    pub shape_id: ShapeId,
    pub value: Node,
    pub options: ValidationOptions,
}

impl ShapeValue {
    /// The value of a `default` trait applied to `shape_id`.
    ///
    /// Range violations by zero are warnings, so models that relied on
    /// implicit zero defaults keep loading.
    pub fn default_trait(shape_id: ShapeId, value: Node) -> Self {
        let options = ValidationOptions::default()
            .with_event_id(DEFAULT_TRAIT_EVENT_ID)
            .with_event_shape_id(shape_id.clone())
            .with_starting_context(DEFAULT_TRAIT_CONTEXT)
            .with_feature(Feature::RangeTraitZeroValueWarning);
        Self {
            shape_id,
            value,
            options,
        }
    }
}

/// Every trait-carried value in a model, keyed by the shape it targets.
#[derive(Debug, Default)]
pub struct ShapeValueIndex {
    values: IndexMap<ShapeId, Vec<ShapeValue>>,
}

impl KnowledgeIndex for ShapeValueIndex {
    fn build(model: &Model) -> Self {
        let mut values: IndexMap<ShapeId, Vec<ShapeValue>> = IndexMap::new();
        for shape in model.shapes() {
            if prelude::is_prelude_shape(shape.id()) {
                continue;
            }
            if let Some(default) = shape.get_trait(prelude::DEFAULT).filter(|v| !v.is_null()) {
                values
                    .entry(shape.id().clone())
                    .or_default()
                    .push(ShapeValue::default_trait(shape.id().clone(), default.clone()));
            }
        }
        tracing::debug!(shapes = values.len(), "collected trait-carried values");
        Self { values }
    }
}

impl ShapeValueIndex {
    pub fn of(model: &Model) -> Arc<Self> {
        model.knowledge::<Self>()
    }

    /// Values that must conform to `shape_id`.
    pub fn shape_values(&self, shape_id: &ShapeId) -> &[ShapeValue] {
        self.values.get(shape_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeValue> {
        self.values.values().flatten()
    }
}

/// Validate every trait-carried value in `model`.
pub fn validate_shape_values(model: &Model) -> Vec<ValidationEvent> {
    let values = ShapeValueIndex::of(model);
    let index = ValidatorIndex::of(model);
    let mut events = Vec::new();
    for shape_value in values.iter() {
        let mut ctx = shape_value.options.context();
        match index.validate(model, &shape_value.shape_id, &shape_value.value, &mut ctx) {
            Ok(found) => events.extend(found),
            Err(err) => tracing::warn!(error = %err, "skipping trait-carried value"),
        }
    }
    events
}
