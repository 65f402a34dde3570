//! Validates the `range` trait on numeric shapes and members.

use std::cmp::Ordering;

use serde_json::Number;
use shapeval_model::node::{integral_value, is_floating_point};
use shapeval_model::prelude;
use shapeval_model::traits::RangeTrait;
use shapeval_model::{Model, Node, NodeValue, Shape};

use super::{member_or_shape_trait, Emitter, NodeValidatorPlugin};
use crate::context::{Feature, PluginContext};
use crate::event::Severity;

/// Checks numbers against inclusive `range` bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangePlugin;

impl NodeValidatorPlugin for RangePlugin {
    fn name(&self) -> &'static str {
        "range"
    }

    fn applies_to(&self, model: &Model, shape: &Shape) -> bool {
        member_or_shape_trait(model, shape, prelude::RANGE, |t| t.is_number()).is_some()
    }

    fn apply(&self, shape: &Shape, value: &Node, ctx: &PluginContext<'_>, emitter: &mut Emitter) {
        let Some(trait_value) = shape.get_trait(prelude::RANGE) else {
            return;
        };
        let Some(range) = RangeTrait::from_node(trait_value) else {
            tracing::debug!(shape = %shape.id(), "skipping malformed range trait");
            return;
        };

        match value.value() {
            NodeValue::Number(number) => check_number(shape, &range, value, number, ctx, emitter),
            NodeValue::String(text) => check_non_numeric(shape, &range, value, text, ctx, emitter),
            _ => {}
        }
    }
}

fn check_number(
    shape: &Shape,
    range: &RangeTrait,
    value: &Node,
    number: &Number,
    ctx: &PluginContext<'_>,
    emitter: &mut Emitter,
) {
    let severity = severity(ctx, is_zero(number));

    if let Some(min) = &range.min {
        if compare(number, min) == Some(Ordering::Less) {
            emitter.emit(
                value,
                severity,
                format!(
                    "Value provided for `{}` must be greater than or equal to {min}, but found {number}",
                    shape.id()
                ),
            );
        }
    }

    if let Some(max) = &range.max {
        if compare(number, max) == Some(Ordering::Greater) {
            emitter.emit(
                value,
                severity,
                format!(
                    "Value provided for `{}` must be less than or equal to {max}, but found {number}",
                    shape.id()
                ),
            );
        }
    }
}

/// `NaN`, `Infinity` and `-Infinity` are the string forms of floats.
fn check_non_numeric(
    shape: &Shape,
    range: &RangeTrait,
    value: &Node,
    text: &str,
    ctx: &PluginContext<'_>,
    emitter: &mut Emitter,
) {
    let severity = severity(ctx, false);
    match text {
        "NaN" => emitter.emit(
            value,
            severity,
            format!(
                "Value provided for `{}` must be a number because the `smithy.api#range` trait is applied, but found \"{text}\"",
                shape.id()
            ),
        ),
        "Infinity" => {
            if let Some(max) = &range.max {
                emitter.emit(
                    value,
                    severity,
                    format!(
                        "Value provided for `{}` must be less than or equal to {max}, but found \"{text}\"",
                        shape.id()
                    ),
                );
            }
        }
        "-Infinity" => {
            if let Some(min) = &range.min {
                emitter.emit(
                    value,
                    severity,
                    format!(
                        "Value provided for `{}` must be greater than or equal to {min}, but found \"{text}\"",
                        shape.id()
                    ),
                );
            }
        }
        _ => {}
    }
}

fn severity(ctx: &PluginContext<'_>, zero: bool) -> Severity {
    if ctx.has_feature(Feature::AllowConstraintErrors)
        || (zero && ctx.has_feature(Feature::RangeTraitZeroValueWarning))
    {
        Severity::Warning
    } else {
        Severity::Error
    }
}

fn is_zero(number: &Number) -> bool {
    match integral_value(number) {
        Some(n) => n == 0,
        None => number.as_f64() == Some(0.0),
    }
}

/// Exact for integral pairs, by `f64` otherwise.
fn compare(a: &Number, b: &Number) -> Option<Ordering> {
    if !is_floating_point(a) && !is_floating_point(b) {
        if let (Some(a), Some(b)) = (integral_value(a), integral_value(b)) {
            return Some(a.cmp(&b));
        }
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}
