//! Objects validated as unions: at most one member may be set.

use indexmap::IndexMap;
use shapeval_model::{Node, NodeType};

use super::{ShapeValidator, Slot, Walk};
use crate::context::ValidationContext;
use crate::event::ValidationEvent;

pub(super) fn validate(
    validator: &ShapeValidator,
    walk: &Walk<'_>,
    members: &IndexMap<String, Slot>,
    value: &Node,
    ctx: &mut ValidationContext,
) -> Vec<ValidationEvent> {
    let Some(object) = value.as_object() else {
        return validator.invalid_shape(value, &[NodeType::Object], ctx);
    };

    let mut events = validator.apply_plugins(walk, value, ctx);
    if object.len() > 1 {
        events.push(ctx.error(
            "union values can contain a value for only a single member",
            value.location(),
        ));
        return events;
    }

    for (name, entry) in object {
        events.extend(validator.member_entry(walk, members, value, name, entry, ctx));
    }
    events
}
