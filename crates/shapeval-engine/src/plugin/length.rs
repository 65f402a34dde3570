//! Validates the `length` trait.
//!
//! What "length" means depends on the value's shape: code points for
//! strings, UTF-8 bytes for blobs, elements for lists and entries for maps.

use shapeval_model::prelude;
use shapeval_model::traits::LengthTrait;
use shapeval_model::{Model, Node, NodeValue, Shape, ShapeType};

use super::{member_or_shape_trait, value_type, Emitter, NodeValidatorPlugin};
use crate::context::PluginContext;

/// Checks sizes against inclusive `length` bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthPlugin;

fn accepts(shape_type: ShapeType) -> bool {
    matches!(
        shape_type,
        ShapeType::String | ShapeType::Blob | ShapeType::List | ShapeType::Map
    )
}

impl NodeValidatorPlugin for LengthPlugin {
    fn name(&self) -> &'static str {
        "length"
    }

    fn applies_to(&self, model: &Model, shape: &Shape) -> bool {
        member_or_shape_trait(model, shape, prelude::LENGTH, accepts).is_some()
    }

    fn apply(&self, shape: &Shape, value: &Node, ctx: &PluginContext<'_>, emitter: &mut Emitter) {
        let Some(trait_value) = shape.get_trait(prelude::LENGTH) else {
            return;
        };
        let Some(length) = LengthTrait::from_node(trait_value) else {
            tracing::debug!(shape = %shape.id(), "skipping malformed length trait");
            return;
        };
        let Some(shape_type) = value_type(ctx.model(), shape) else {
            return;
        };

        let (size, unit) = match (shape_type, value.value()) {
            (ShapeType::String, NodeValue::String(s)) => (s.chars().count(), Unit::Characters),
            (ShapeType::Blob, NodeValue::String(s)) => (s.len(), Unit::Bytes),
            (ShapeType::List, NodeValue::Array(items)) => (items.len(), Unit::Elements),
            (ShapeType::Map, NodeValue::Object(entries)) => (entries.len(), Unit::Entries),
            _ => return,
        };
        let count = i64::try_from(size).unwrap_or(i64::MAX);
        let severity = ctx.constraint_severity();

        if let Some(min) = length.min.filter(|&min| count < min) {
            emitter.emit(value, severity, unit.too_short(shape, min, size));
        }
        if let Some(max) = length.max.filter(|&max| count > max) {
            emitter.emit(value, severity, unit.too_long(shape, max, size));
        }
    }
}

/// What a length counts, by value shape.
#[derive(Debug, Clone, Copy)]
enum Unit {
    Characters,
    Bytes,
    Elements,
    Entries,
}

impl Unit {
    fn too_short(self, shape: &Shape, min: i64, size: usize) -> String {
        let id = shape.id();
        match self {
            Unit::Characters => format!(
                "String value provided for `{id}` must be >= {min} characters, but the provided value is only {size} characters."
            ),
            Unit::Bytes => {
                format!("Value provided for `{id}` must be >= {min} bytes, but {size} bytes were provided.")
            }
            Unit::Elements => format!(
                "Value provided for `{id}` must have at least {min} elements, but the provided value only has {size} elements"
            ),
            Unit::Entries => format!(
                "Value provided for `{id}` must have at least {min} entries, but the provided value only has {size} entries"
            ),
        }
    }

    fn too_long(self, shape: &Shape, max: i64, size: usize) -> String {
        let id = shape.id();
        match self {
            Unit::Characters => format!(
                "String value provided for `{id}` must be <= {max} characters, but the provided value is {size} characters."
            ),
            Unit::Bytes => {
                format!("Value provided for `{id}` must be <= {max} bytes, but {size} bytes were provided.")
            }
            Unit::Elements => format!(
                "Value provided for `{id}` must have at most {max} elements, but the provided value has {size} elements"
            ),
            Unit::Entries => format!(
                "Value provided for `{id}` must have at most {max} entries, but the provided value has {size} entries"
            ),
        }
    }
}
