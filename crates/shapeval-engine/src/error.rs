//! # Error Types
//!
//! The engine reports value mismatches as [`ValidationEvent`](crate::ValidationEvent)s,
//! never as errors. The only failure a caller can observe is asking for a
//! shape the model does not contain.

use shapeval_model::ShapeId;
use thiserror::Error;

/// Error invoking the validation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The root shape of a validation call is not in the model.
    #[error("shape `{0}` is not defined in the model")]
    UnknownShape(ShapeId),

    /// Validation options could not be loaded.
    #[error("invalid validation options: {0}")]
    InvalidOptions(String),
}
