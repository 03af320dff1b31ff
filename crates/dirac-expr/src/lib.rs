//! Expression evaluator for complex scalars and matrices.
//!
//! This crate turns a plain-text arithmetic expression into either a complex
//! number or a dense complex matrix. It is the numeric back end of the Dirac
//! notation engine: kets and bras are rewritten into matrix literals and
//! handed to [`evaluate`].
//!
//! # Language
//!
//! | Feature | Example |
//! |---------|---------|
//! | Real literals | `2`, `0.5`, `.25`, `1e-3` |
//! | Constants | `pi`, `e`, `i` |
//! | Arithmetic | `+ - * / ^`, unary `-` |
//! | Implicit multiplication | `2i`, `sin(pi/4) [1; 0]`, `(a)(b)` |
//! | Matrix literals | `[1; 0]` (column), `[1, 0]` (row), `[[1, 0], [0, 1]]` |
//! | Functions | `sqrt exp log sin cos tan asin acos atan sinh cosh tanh` |
//! | Matrix functions | `conj transpose ctranspose abs re im arg` |
//!
//! Identifiers are tokenized as a whole, so the imaginary unit `i` never
//! collides with the letter `i` inside `sin` or `pi`.
//!
//! # Example
//!
//! ```rust
//! use dirac_expr::{Evaluated, evaluate};
//!
//! let value = evaluate("conj(transpose([1; i])) [1; i]").unwrap();
//! assert_eq!(value.as_scalar().unwrap().re, 2.0);
//!
//! let ket = evaluate("sin(pi/4) [1; 0] + cos(pi/4) [0; 1]").unwrap();
//! assert!(matches!(ket, Evaluated::Matrix(ref m) if m.dim() == (2, 1)));
//! ```

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;

pub use error::{EvalError, EvalResult};
pub use eval::{Evaluated, MAX_ELEMENTS, eval_expression, evaluate};
pub use parser::{MAX_DEPTH, parse_expression};

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}
