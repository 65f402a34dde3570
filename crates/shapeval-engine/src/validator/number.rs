//! Integral numbers with inclusive bounds.
//!
//! A floating point literal is rejected before bounds are considered, and
//! plugins only run for values inside the bounds.

use shapeval_model::node::{integral_value, is_floating_point};
use shapeval_model::{Node, NodeType};

use super::{ShapeValidator, Walk};
use crate::context::ValidationContext;
use crate::event::ValidationEvent;

pub(super) fn validate(
    validator: &ShapeValidator,
    walk: &Walk<'_>,
    min: Option<i128>,
    max: Option<i128>,
    value: &Node,
    ctx: &mut ValidationContext,
) -> Vec<ValidationEvent> {
    let Some(number) = value.as_number() else {
        return validator.invalid_shape(value, &[NodeType::Number], ctx);
    };
    let shape = validator.shape();
    if is_floating_point(number) {
        let message = format!(
            "{} shapes must not have floating point values, but found `{number}` provided for `{}`",
            shape.shape_type(),
            shape.id()
        );
        return vec![ctx.error(&message, value.location())];
    }

    // Beyond i128 the sign alone decides which bound is violated.
    let (below, above) = match integral_value(number) {
        Some(n) => (min.is_some_and(|min| n < min), max.is_some_and(|max| n > max)),
        None => {
            let negative = number.to_string().starts_with('-');
            (negative && min.is_some(), !negative && max.is_some())
        }
    };
    // The wording says "> min" and "< max" but both bounds are accepted.
    if let (true, Some(min)) = (below, min) {
        let message = format!("{} value must be > {min}, but found {number}", shape.shape_type());
        return vec![ctx.error(&message, value.location())];
    }
    if let (true, Some(max)) = (above, max) {
        let message = format!("{} value must be < {max}, but found {number}", shape.shape_type());
        return vec![ctx.error(&message, value.location())];
    }

    validator.apply_plugins(walk, value, ctx)
}
