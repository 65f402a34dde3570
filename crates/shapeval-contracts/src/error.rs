//! # Error Types

use thiserror::Error;

/// Error reading declarative conditions from a model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractsError {
    /// The `conditions` trait value does not have the expected structure.
    #[error("malformed conditions on `{shape}`: {reason}")]
    MalformedConditions {
        /// The shape carrying the trait.
        shape: String,
        /// What was wrong with the value.
        reason: String,
    },
}

/// An expression rejected by an [`ExpressionParser`](crate::ExpressionParser).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExpressionError {
    pub message: String,
}

impl ExpressionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
