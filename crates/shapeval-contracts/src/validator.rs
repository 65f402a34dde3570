//! # Conditions Checker
//!
//! For every shape carrying the `conditions` trait:
//!
//! 1. Each condition's expression is parsed. A parse failure is a single
//!    non-suppressible error and the condition's examples are not run.
//! 2. Each `valid` example is validated against the shape and every
//!    resulting event is reported.
//! 3. Each `invalid` example is validated against the shape. Its non-error
//!    events are reported; its errors are the expected outcome and are
//!    dropped. If it produced no error at all, one synthetic error says so.
//!
//! Examples go through the engine's cached [`ValidatorIndex`]; the checker
//! only looks at the severities of what comes back.

use shapeval_engine::{Severity, ValidationEvent, ValidationOptions, ValidatorIndex};
use shapeval_model::{Model, Node, Shape};

use crate::condition::{Condition, ConditionsTrait, CONDITIONS};
use crate::expression::ExpressionParser;

/// Event id of conditions diagnostics.
pub const EVENT_ID: &str = "ConditionsTrait";

/// Checks `conditions` traits with a given expression parser.
#[derive(Debug, Clone)]
pub struct ConditionsValidator<P> {
    parser: P,
}

impl<P: ExpressionParser> ConditionsValidator<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    /// Check every shape in `model` that carries the `conditions` trait.
    pub fn validate(&self, model: &Model) -> Vec<ValidationEvent> {
        let index = ValidatorIndex::of(model);
        let mut events = Vec::new();
        for shape in model.shapes_with_trait(CONDITIONS) {
            match ConditionsTrait::from_shape(shape) {
                Ok(Some(conditions)) => {
                    for condition in &conditions.conditions {
                        events.extend(self.validate_condition(model, &index, shape, condition));
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(shape = %shape.id(), error = %err, "skipping malformed conditions trait");
                }
            }
        }
        events
    }

    fn validate_condition(
        &self,
        model: &Model,
        index: &ValidatorIndex,
        shape: &Shape,
        condition: &Condition,
    ) -> Vec<ValidationEvent> {
        if let Err(err) = self.parser.parse(&condition.expression) {
            return vec![ValidationEvent {
                id: EVENT_ID.to_string(),
                severity: Severity::Error,
                shape_id: Some(shape.id().clone()),
                message: format!(
                    "Invalid condition expression ({}): {err}",
                    condition.expression
                ),
                source_location: shape.location().clone(),
                suppressible: false,
            }];
        }

        let mut events = Vec::new();

        for (i, example) in condition.examples.valid.iter().enumerate() {
            let options = example_options(shape, format!("{EVENT_ID}.valid.{i}"), format!("Valid shape example `{example}`"));
            events.extend(run_example(model, index, shape, example, &options));
        }

        for (i, example) in condition.examples.invalid.iter().enumerate() {
            let event_id = format!("{EVENT_ID}.invalid.{i}");
            let options = example_options(shape, event_id.clone(), format!("Invalid shape example `{example}`"));
            let found = run_example(model, index, shape, example, &options);
            let failed = found.iter().any(ValidationEvent::is_error);
            events.extend(found.into_iter().filter(|event| !event.is_error()));
            if !failed {
                events.push(ValidationEvent {
                    id: event_id,
                    severity: Severity::Error,
                    shape_id: Some(shape.id().clone()),
                    message: format!(
                        "Invalid shape example `{example}` passed all validations when it shouldn't have"
                    ),
                    source_location: example.location().clone(),
                    suppressible: true,
                });
            }
        }

        events
    }
}

fn example_options(shape: &Shape, event_id: String, context: String) -> ValidationOptions {
    ValidationOptions::default()
        .with_event_id(event_id)
        .with_event_shape_id(shape.id().clone())
        .with_starting_context(context)
}

fn run_example(
    model: &Model,
    index: &ValidatorIndex,
    shape: &Shape,
    example: &Node,
    options: &ValidationOptions,
) -> Vec<ValidationEvent> {
    let mut ctx = options.context();
    index
        .validate(model, shape.id(), example, &mut ctx)
        .unwrap_or_else(|err| {
            tracing::warn!(shape = %shape.id(), error = %err, "could not validate example");
            Vec::new()
        })
}
