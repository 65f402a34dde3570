//! Objects validated as structures.
//!
//! Unknown members are always warnings. Missing required members are
//! errors, or warnings when constraint errors are allowed.

use indexmap::IndexMap;
use shapeval_model::{Node, NodeType};

use super::{ShapeValidator, Slot, Walk};
use crate::context::{Feature, ValidationContext};
use crate::event::{Severity, ValidationEvent};

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
    for (name, entry) in object {
        events.extend(validator.member_entry(walk, members, value, name, entry, ctx));
    }

    let severity = if ctx.has_feature(Feature::AllowConstraintErrors) {
        Severity::Warning
    } else {
        Severity::Error
    };
    let shape = validator.shape();
    for (name, member_id) in shape.members() {
        let required = walk
            .model
            .get_shape(member_id)
            .is_some_and(|member| member.is_required());
        if required && !object.contains_key(name) {
            let message = format!(
                "Missing required structure member `{name}` for `{}`",
                shape.id()
            );
            events.push(ctx.event(&message, severity, value.location(), &[]));
        }
    }
    events
}
