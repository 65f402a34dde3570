//! Scalars that accept a fixed set of node types.

use shapeval_model::{Node, NodeType};

use super::{ShapeValidator, Walk};
use crate::context::ValidationContext;
use crate::event::ValidationEvent;

pub(super) fn validate(
    validator: &ShapeValidator,
    walk: &Walk<'_>,
    accepts: &[NodeType],
    value: &Node,
    ctx: &mut ValidationContext,
) -> Vec<ValidationEvent> {
    if accepts.contains(&value.node_type()) {
        validator.apply_plugins(walk, value, ctx)
    } else {
        validator.invalid_shape(value, accepts, ctx)
    }
}
