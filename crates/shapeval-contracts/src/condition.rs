//! # The `conditions` Trait
//!
//! Declares named conditions on a shape. Each condition has an expression
//! and optional example values that must pass or fail validation:
//!
//! ```json
//! {
//!   "smithy.contracts#conditions": {
//!     "StartBeforeEnd": {
//!       "expression": "start < end",
//!       "documentation": "The window must not be empty.",
//!       "examples": {"valid": [{"start": 1, "end": 2}], "invalid": [{"start": 1}]}
//!     }
//!   }
//! }
//! ```

use shapeval_model::{Node, Shape};

use crate::error::ContractsError;

/// Absolute id of the `conditions` trait.
pub const CONDITIONS: &str = "smithy.contracts#conditions";

/// Example values attached to a condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeExamples {
    /// Values expected to validate without errors.
    pub valid: Vec<Node>,
    /// Values expected to produce at least one error.
    pub invalid: Vec<Node>,
}

/// One named condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub name: String,
    pub expression: String,
    pub documentation: Option<String>,
    pub examples: ShapeExamples,
}

/// The parsed value of a `conditions` trait, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionsTrait {
    pub conditions: Vec<Condition>,
}

impl ConditionsTrait {
    /// Parse the trait applied to `shape`, if any.
    ///
    /// # Errors
    ///
    /// Returns `ContractsError::MalformedConditions` if the trait value is
    /// not an object of condition objects, a condition lacks a string
    /// `expression`, or an example list is not an array.
    pub fn from_shape(shape: &Shape) -> Result<Option<Self>, ContractsError> {
        shape
            .get_trait(CONDITIONS)
            .map(|value| Self::from_node(&shape.id().to_string(), value))
            .transpose()
    }

    /// Parse a trait value. `shape` is used only in error messages.
    ///
    /// # Errors
    ///
    /// See [`ConditionsTrait::from_shape`].
    pub fn from_node(shape: &str, value: &Node) -> Result<Self, ContractsError> {
        let malformed = |reason: String| ContractsError::MalformedConditions {
            shape: shape.to_string(),
            reason,
        };

        let entries = value
            .as_object()
            .ok_or_else(|| malformed(format!("expected an object, found {}", value.node_type())))?;

        let mut conditions = Vec::with_capacity(entries.len());
        for (name, body) in entries {
            let fields = body
                .as_object()
                .ok_or_else(|| malformed(format!("condition `{name}` must be an object")))?;
            let expression = fields
                .get("expression")
                .and_then(Node::as_str)
                .ok_or_else(|| malformed(format!("condition `{name}` requires a string `expression`")))?;
            let documentation = match fields.get("documentation") {
                None => None,
                Some(doc) => Some(
                    doc.as_str()
                        .ok_or_else(|| malformed(format!("documentation of `{name}` must be a string")))?
                        .to_string(),
                ),
            };
            let examples = match fields.get("examples") {
                None => ShapeExamples::default(),
                Some(examples) => parse_examples(name, examples).map_err(malformed)?,
            };
            conditions.push(Condition {
                name: name.clone(),
                expression: expression.to_string(),
                documentation,
                examples,
            });
        }
        Ok(Self { conditions })
    }
}

fn parse_examples(name: &str, value: &Node) -> Result<ShapeExamples, String> {
    let fields = value
        .as_object()
        .ok_or_else(|| format!("examples of `{name}` must be an object"))?;
    let list = |key: &str| -> Result<Vec<Node>, String> {
        match fields.get(key) {
            None => Ok(Vec::new()),
            Some(items) => items
                .as_array()
                .map(<[Node]>::to_vec)
                .ok_or_else(|| format!("`{key}` examples of `{name}` must be an array")),
        }
    };
    Ok(ShapeExamples {
        valid: list("valid")?,
        invalid: list("invalid")?,
    })
}
