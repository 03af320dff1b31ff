//! Error types for the expression evaluator.

use thiserror::Error;

/// Errors that can occur while parsing or evaluating an expression.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EvalError {
    /// Lexer error (invalid token).
    #[error("Lexer error at position {position}: {message}")]
    LexerError { position: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Identifier that is neither a constant nor a function.
    #[error("Undefined symbol: {0}")]
    UnknownIdentifier(String),

    /// Call syntax applied to an unknown name.
    #[error("Undefined function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments.
    #[error("Function '{name}' expects {expected} argument(s), got {got}")]
    WrongArgumentCount {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Operand dimensions are incompatible.
    #[error("Dimension mismatch in '{op}': {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Rows or blocks of a matrix literal do not line up.
    #[error("Ragged matrix literal: {0}")]
    RaggedMatrix(String),

    /// Expression nests deeper than the parser allows.
    #[error("Expression nested too deeply at position {position} (limit {limit})")]
    NestingTooDeep { position: usize, limit: usize },

    /// Result would exceed the element limit.
    #[error("Matrix of {rows}x{cols} exceeds the limit of {limit} elements")]
    TooLarge {
        rows: usize,
        cols: usize,
        limit: usize,
    },

    /// Operation undefined for the given operands.
    #[error("Domain error: {0}")]
    Domain(String),
}

/// Result type for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
