//! Arrays, validated element by element under their index.

use shapeval_model::{Node, NodeType};

use super::{ShapeValidator, Slot, Walk};
use crate::context::ValidationContext;
use crate::event::ValidationEvent;

pub(super) fn validate(
    validator: &ShapeValidator,
    walk: &Walk<'_>,
    member: Slot,
    value: &Node,
    ctx: &mut ValidationContext,
) -> Vec<ValidationEvent> {
    let Some(elements) = value.as_array() else {
        return validator.invalid_shape(value, &[NodeType::Array], ctx);
    };

    let mut events = validator.apply_plugins(walk, value, ctx);
    for (i, element) in elements.iter().enumerate() {
        events.extend(ShapeValidator::traverse(walk, member, i.to_string(), element, ctx));
    }
    events
}
