//! # shapeval-contracts — Declarative Shape Conditions
//!
//! Shapes may declare named conditions through the
//! `smithy.contracts#conditions` trait, each with an expression and example
//! values that must pass or fail validation. [`ConditionsValidator`] checks
//! that every expression parses and that every example behaves as declared.
//!
//! ## Key Design Principles
//!
//! 1. **No second traversal.** Examples are validated by `shapeval-engine`.
//!    This crate only inspects the severities of the events it gets back.
//!
//! 2. **The expression language is pluggable.** Parsing is delegated to an
//!    [`ExpressionParser`]; any `Fn(&str) -> Result<(), ExpressionError>`
//!    qualifies.
//!
//! 3. **Authoring defects are not suppressible.** An expression that does
//!    not parse is reported with `suppressible: false`.
//!
//! ## Crate Policy
//!
//! - Depends on `shapeval-model` and `shapeval-engine` internally.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod condition;
pub mod error;
pub mod expression;
pub mod validator;

pub use condition::{Condition, ConditionsTrait, ShapeExamples, CONDITIONS};
pub use error::{ContractsError, ExpressionError};
pub use expression::ExpressionParser;
pub use validator::ConditionsValidator;
