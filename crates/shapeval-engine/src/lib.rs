//! # shapeval-engine — Shape-Driven Node Validation
//!
//! Checks literal [`Node`](shapeval_model::Node) values against the shapes
//! of a [`Model`](shapeval_model::Model) and reports every mismatch as a
//! [`ValidationEvent`].
//!
//! ```no_run
//! use shapeval_engine::{ValidationOptions, ValidatorIndex};
//! use shapeval_model::{ast, Node};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ast::parse(r#"{"shapes": {"ex#Age": {"type": "byte"}}}"#)?;
//! let index = ValidatorIndex::of(&model);
//! let mut ctx = ValidationOptions::default().context();
//! let events = index.validate(&model, &"ex#Age".parse()?, &Node::integer(300), &mut ctx)?;
//! assert_eq!(events[0].message, "byte value must be < 127, but found 300");
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Mismatches are data, not errors.** Validation never fails because a
//!    value is wrong; it returns events. [`EngineError`] is reserved for
//!    misuse, such as naming a shape the model does not contain.
//!
//! 2. **Cycle-safe construction, finite traversal.** Validators are built in
//!    two phases (create by id, then resolve children by id), so recursive
//!    shapes need no ordering. Validation recurses over the value, which is
//!    always finite.
//!
//! 3. **Narrow extension point.** Plugins see a shape, a value, a read-only
//!    [`PluginContext`] and an [`Emitter`]. New constraint traits need no
//!    changes to the validators.
//!
//! ## Crate Policy
//!
//! - Depends only on `shapeval-model` internally.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod context;
pub mod error;
pub mod event;
pub mod index;
pub mod plugin;
pub mod shape_value;
pub mod timestamp;
pub mod trait_lint;
pub mod validator;

pub use context::{
    Feature, NullabilityMode, PluginContext, TimestampValidationStrategy, ValidationContext,
    ValidationOptions,
};
pub use error::EngineError;
pub use event::{Severity, ValidationEvent};
pub use index::ValidatorIndex;
pub use plugin::{Emission, Emitter, NodeValidatorPlugin, PluginRegistry};
pub use shape_value::{validate_shape_values, ShapeValue, ShapeValueIndex};
pub use trait_lint::lint_constraint_traits;
pub use validator::ShapeValidator;

use shapeval_model::{Model, Node, ShapeId};

/// Validate `value` against `shape_id` with the model's cached index and a
/// fresh context built from `options`.
///
/// # Errors
///
/// Returns `EngineError::UnknownShape` if `shape_id` is not in the model.
pub fn validate_value(
    model: &Model,
    shape_id: &ShapeId,
    value: &Node,
    options: &ValidationOptions,
) -> Result<Vec<ValidationEvent>, EngineError> {
    let mut ctx = options.context();
    ValidatorIndex::of(model).validate(model, shape_id, value, &mut ctx)
}
