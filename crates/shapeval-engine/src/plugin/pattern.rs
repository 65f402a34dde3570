//! Validates the `pattern` trait on strings.

use std::collections::HashMap;

use parking_lot::Mutex;
use regex::Regex;
use shapeval_model::prelude;
use shapeval_model::{Model, Node, Shape, ShapeType};

use super::{member_or_shape_trait, Emitter, NodeValidatorPlugin};
use crate::context::PluginContext;

/// Requires string values to contain a match for the `pattern` regex.
///
/// Patterns are not implicitly anchored: `^` and `$` must be written out.
/// Compiled expressions are cached per pattern text; a pattern that fails
/// to compile is remembered and skipped.
#[derive(Debug, Default)]
pub struct PatternPlugin {
    compiled: Mutex<HashMap<String, Option<Regex>>>,
}

impl PatternPlugin {
    fn regex(&self, pattern: &str) -> Option<Regex> {
        let mut compiled = self.compiled.lock();
        compiled
            .entry(pattern.to_string())
            .or_insert_with(|| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::debug!(pattern, error = %err, "skipping invalid pattern trait");
                    None
                }
            })
            .clone()
    }
}

impl NodeValidatorPlugin for PatternPlugin {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn applies_to(&self, model: &Model, shape: &Shape) -> bool {
        member_or_shape_trait(model, shape, prelude::PATTERN, |t| t == ShapeType::String).is_some()
    }

    fn apply(&self, shape: &Shape, value: &Node, ctx: &PluginContext<'_>, emitter: &mut Emitter) {
        let (Some(pattern), Some(text)) = (
            shape.get_trait(prelude::PATTERN).and_then(Node::as_str),
            value.as_str(),
        ) else {
            return;
        };
        let Some(regex) = self.regex(pattern) else {
            return;
        };

        if !regex.is_match(text) {
            emitter.emit(
                value,
                ctx.constraint_severity(),
                format!(
                    "String value provided for `{}` must match regex expression of `{pattern}`",
                    shape.id()
                ),
            );
        }
    }
}
