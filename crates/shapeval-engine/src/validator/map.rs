//! Objects validated as maps: every key against the key member, every
//! value against the value member.

use shapeval_model::{Node, NodeType};

use super::{ShapeValidator, Slot, Walk};
use crate::context::ValidationContext;
use crate::event::ValidationEvent;

pub(super) fn validate(
    validator: &ShapeValidator,
    walk: &Walk<'_>,
    key: Slot,
    value_slot: Slot,
    value: &Node,
    ctx: &mut ValidationContext,
) -> Vec<ValidationEvent> {
    let Some(entries) = value.as_object() else {
        return validator.invalid_shape(value, &[NodeType::Object], ctx);
    };

    let mut events = validator.apply_plugins(walk, value, ctx);
    for (name, entry) in entries {
        // Keys carry no location of their own; report them at the object.
        let key_node = Node::string(name.as_str()).with_location(value.location().clone());
        events.extend(ShapeValidator::traverse(
            walk,
            key,
            format!("{name} (map-key)"),
            &key_node,
            ctx,
        ));
        events.extend(ShapeValidator::traverse(walk, value_slot, name.clone(), entry, ctx));
    }
    events
}
