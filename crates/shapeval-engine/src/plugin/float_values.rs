//! Restricts string values of float and double shapes to the non-numeric
//! float literals.

use shapeval_model::{Model, Node, Shape, ShapeType};

use super::{Emitter, NodeValidatorPlugin};
use crate::context::PluginContext;
use crate::event::Severity;

const NON_NUMERIC_FLOATS: [&str; 3] = ["NaN", "Infinity", "-Infinity"];

#[derive(Debug, Clone, Copy, Default)]
pub struct NonNumericFloatValuesPlugin;

impl NodeValidatorPlugin for NonNumericFloatValuesPlugin {
    fn name(&self) -> &'static str {
        "non_numeric_float_values"
    }

    fn applies_to(&self, _model: &Model, shape: &Shape) -> bool {
        matches!(shape.shape_type(), ShapeType::Float | ShapeType::Double)
    }

    fn apply(&self, shape: &Shape, value: &Node, _ctx: &PluginContext<'_>, emitter: &mut Emitter) {
        let Some(text) = value.as_str() else {
            return;
        };
        if !NON_NUMERIC_FLOATS.contains(&text) {
            emitter.emit(
                value,
                Severity::Error,
                format!(
                    "Value for `{}` must either be numeric or one of the following strings: [\"NaN\", \"Infinity\", \"-Infinity\"], but was \"{text}\"",
                    shape.id()
                ),
            );
        }
    }
}
