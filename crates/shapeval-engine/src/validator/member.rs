//! Members wrap their target's validator.
//!
//! The member runs its own plugins (member-level traits), checks null
//! against the member's nullability, then hands the value to the target
//! with itself recorded as the referring member.

use shapeval_model::{Node, ShapeType};

use super::{ShapeValidator, Slot, Walk};
use crate::context::{NullabilityMode, ValidationContext};
use crate::event::ValidationEvent;

pub(super) fn validate(
    validator: &ShapeValidator,
    walk: &Walk<'_>,
    target: Slot,
    container: Option<ShapeType>,
    value: &Node,
    ctx: &mut ValidationContext,
) -> Vec<ValidationEvent> {
    let mut events = validator.apply_plugins(walk, value, ctx);

    if value.is_null() && ctx.nullability() == NullabilityMode::Enforced && !validator.nullable {
        events.extend(null_member(validator, container, value, ctx));
    }

    if let Some(target) = target.and_then(|i| walk.index.validator_at(i)) {
        // Single slot: set for the target, then cleared (not restored) on return.
        ctx.set_referring_member(Some(validator.shape().id().clone()));
        events.extend(target.validate(walk, value, ctx));
        ctx.set_referring_member(None);
    }
    events
}

fn null_member(
    validator: &ShapeValidator,
    container: Option<ShapeType>,
    value: &Node,
    ctx: &ValidationContext,
) -> Option<ValidationEvent> {
    let shape = validator.shape();
    let def = shape.as_member()?;
    let message = match container? {
        ShapeType::List => format!(
            "Non-sparse list shape `{}` cannot contain null values",
            def.container
        ),
        ShapeType::Map => format!(
            "Non-sparse map shape `{}` cannot contain null values",
            def.container
        ),
        ShapeType::Structure => format!(
            "Required structure member `{}` for `{}` cannot be null",
            def.name, def.container
        ),
        _ => return None,
    };
    Some(ctx.error(&message, value.location()))
}
