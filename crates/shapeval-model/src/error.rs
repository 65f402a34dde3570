//! # Error Types
//!
//! Errors raised while constructing a [`Model`](crate::Model). Validation of
//! literal values never produces these; value mismatches are reported as
//! diagnostics by the engine crate.

use thiserror::Error;

/// Error building or loading a shape graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A shape id string does not follow `namespace#Name[$member]`.
    #[error("invalid shape id `{input}`: {reason}")]
    InvalidShapeId {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Two shapes were registered under the same id.
    #[error("duplicate shape `{0}`")]
    DuplicateShape(String),

    /// A trait was applied to a shape id the model does not contain.
    #[error("trait `{trait_id}` applied to unknown shape `{shape}`")]
    UnknownTraitTarget {
        /// The shape the trait was aimed at.
        shape: String,
        /// The trait being applied.
        trait_id: String,
    },

    /// A JSON AST shape declared a `type` this crate does not model.
    #[error("shape `{shape}` has unknown type `{type_name}`")]
    UnknownShapeType {
        /// The shape carrying the type.
        shape: String,
        /// The unrecognized type name.
        type_name: String,
    },

    /// The JSON AST document is structurally malformed.
    #[error("malformed model at `{path}`: {reason}")]
    MalformedAst {
        /// Dotted path to the offending element.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The input was not valid JSON.
    #[error("json parse error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
