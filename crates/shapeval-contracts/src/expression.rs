//! The seam to the condition expression language.
//!
//! Only the ability to reject a malformed expression is consumed here.
//! Evaluating an expression against a value belongs to the language's own
//! implementation.

use crate::error::ExpressionError;

/// Parses condition expressions.
pub trait ExpressionParser: Send + Sync {
    /// Check that `expression` is well formed.
    ///
    /// # Errors
    ///
    /// Returns an [`ExpressionError`] describing the first syntax problem.
    fn parse(&self, expression: &str) -> Result<(), ExpressionError>;
}

impl<F> ExpressionParser for F
where
    F: Fn(&str) -> Result<(), ExpressionError> + Send + Sync,
{
    fn parse(&self, expression: &str) -> Result<(), ExpressionError> {
        self(expression)
    }
}
