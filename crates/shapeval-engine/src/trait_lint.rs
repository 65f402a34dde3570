//! Consistency checks on constraint trait definitions themselves.

use shapeval_model::traits::{LengthTrait, RangeTrait};
use shapeval_model::{prelude, Model, Shape};

use crate::event::{Severity, ValidationEvent};

/// Report `length` traits with negative bounds or `min > max`, and `range`
/// traits with `min > max`.
pub fn lint_constraint_traits(model: &Model) -> Vec<ValidationEvent> {
    let mut events = Vec::new();

    for shape in model.shapes_with_trait(prelude::LENGTH) {
        let Some(length) = shape.get_trait(prelude::LENGTH).and_then(LengthTrait::from_node) else {
            continue;
        };
        if length.min.is_some_and(|min| min < 0) {
            events.push(error(shape, prelude::LENGTH, "LengthTrait", "A length trait is applied with a negative `min` value."));
        }
        if length.max.is_some_and(|max| max < 0) {
            events.push(error(shape, prelude::LENGTH, "LengthTrait", "A length trait is applied with a negative `max` value."));
        }
        if let (Some(min), Some(max)) = (length.min, length.max) {
            if min > max {
                events.push(error(
                    shape,
                    prelude::LENGTH,
                    "LengthTrait",
                    "A length trait is applied with a `min` value greater than its `max` value.",
                ));
            }
        }
    }

    for shape in model.shapes_with_trait(prelude::RANGE) {
        let Some(range) = shape.get_trait(prelude::RANGE).and_then(RangeTrait::from_node) else {
            continue;
        };
        if let (Some(min), Some(max)) = (range.min_f64(), range.max_f64()) {
            if min > max {
                events.push(error(
                    shape,
                    prelude::RANGE,
                    "RangeTrait",
                    "A range trait is applied with a `min` value greater than its `max` value.",
                ));
            }
        }
    }

    events
}

fn error(shape: &Shape, trait_id: &str, event_id: &str, message: &str) -> ValidationEvent {
    let location = shape
        .get_trait(trait_id)
        .map(|value| value.location().clone())
        .unwrap_or_else(|| shape.location().clone());
    ValidationEvent {
        id: event_id.to_string(),
        severity: Severity::Error,
        shape_id: Some(shape.id().clone()),
        message: message.to_string(),
        source_location: location,
        suppressible: true,
    }
}
