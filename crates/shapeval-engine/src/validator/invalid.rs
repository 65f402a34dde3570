//! Sentinel for shape kinds that cannot describe a value.

use shapeval_model::Node;

use super::ShapeValidator;
use crate::context::ValidationContext;
use crate::event::ValidationEvent;

pub(super) fn validate(
    validator: &ShapeValidator,
    value: &Node,
    ctx: &mut ValidationContext,
) -> Vec<ValidationEvent> {
    let message = format!(
        "Encountered invalid shape type: {}",
        validator.shape().shape_type()
    );
    vec![ctx.error(&message, value.location())]
}
