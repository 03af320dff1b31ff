//! Error types for the notation engine.

use dirac_expr::EvalError;
use thiserror::Error;

use crate::shape::Shape;

/// Errors produced by parsing and by algebra on [`Value`](crate::Value)s.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DiracError {
    /// Malformed or unevaluable notation text.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An operand does not have the shape an operation requires.
    #[error("Shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        /// What the operation needed.
        expected: String,
        /// What it was given.
        found: String,
    },

    /// A value could not be used as a complex scalar.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// Operation not defined for this shape.
    #[error("Unimplemented: {operation} is not defined for {shape}")]
    Unimplemented {
        /// Name of the operation.
        operation: &'static str,
        /// Shape of the value it was invoked on.
        shape: Shape,
    },
}

impl DiracError {
    pub(crate) fn shape_mismatch(expected: impl Into<String>, found: impl ToString) -> Self {
        DiracError::ShapeMismatch {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

impl From<EvalError> for DiracError {
    fn from(err: EvalError) -> Self {
        DiracError::Parse(err.to_string())
    }
}

/// Result type for notation engine operations.
pub type DiracResult<T> = Result<T, DiracError>;
