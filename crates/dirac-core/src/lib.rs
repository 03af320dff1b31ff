//! Dirac Notation Engine
//!
//! This crate evaluates quantum-mechanical expressions written in bra-ket
//! notation and renders the resulting scalar, bra, ket or operator back into
//! canonical, re-parseable notation.
//!
//! # Overview
//!
//! ```text
//! "sin(pi/4)|0> + cos(pi/4)|1>"
//!       │
//!       ▼
//! notation::to_expression ──► dirac_expr::evaluate ──► Value
//!                                                        │
//!                           plus / minus / num / bra / ket / dagger
//!                           abs / normalize / project
//!                                                        │
//!                                                        ▼
//!                                          format(&FormatSpec) ──► text
//! ```
//!
//! Basis labels are binary indices. Operands declared over different
//! numbers of qubits are zero-padded to a common size, never truncated.
//!
//! # Example
//!
//! ```rust
//! use dirac_core::{Value, evaluate_notation};
//!
//! assert_eq!(
//!     evaluate_notation("sin(pi/4) |0> + cos(pi/4) |1>", false).unwrap(),
//!     "0.7071|0> + 0.7071|1>"
//! );
//! assert_eq!(evaluate_notation("|0> + |1>", true).unwrap(), "0.7071|0> + 0.7071|1>");
//!
//! let mut v = Value::parse("|0> + i|1>").unwrap();
//! v.dagger();
//! assert_eq!(v.to_string(), "<0| - i<1|");
//! ```
//!
//! # Output Styles
//!
//! | Style | Constructor | Sample |
//! |-------|-------------|--------|
//! | ASCII | [`FormatSpec::ascii`] | `\|0><1\|` |
//! | Unicode | [`FormatSpec::unicode`] | `\|0〉〈1\|` |
//! | TeX | [`FormatSpec::tex`] | `\|0\rangle\langle1\|` |
//! | HTML | [`FormatSpec::html`] | `<span class="ket">\|0&gt;</span>...` |

mod error;
mod extend;
mod format;
pub mod notation;
mod shape;
mod value;

use tracing::{debug, instrument};

pub use error::{DiracError, DiracResult};
pub use extend::{extend, resize};
pub use format::{FormatSpec, Style, UnknownStyle, format, format_complex, format_real};
pub use shape::{Shape, classify, classify_dims, qubits, qubits_for_dims};
pub use value::{Operand, Value};

/// Evaluate notation text and render the result as ASCII with 4 decimals.
///
/// With `normalize`, scalars, bras and kets are scaled to unit norm before
/// formatting; operators are left as they are.
pub fn evaluate_notation(input: &str, normalize: bool) -> DiracResult<String> {
    evaluate_notation_with(input, normalize, &FormatSpec::ascii())
}

/// [`evaluate_notation`] with an explicit output format.
#[instrument(skip(spec))]
pub fn evaluate_notation_with(
    input: &str,
    normalize: bool,
    spec: &FormatSpec,
) -> DiracResult<String> {
    let mut value = Value::parse(input)?;
    debug!(
        "Parsed {} with dims {:?} over {} qubit(s)",
        value.shape(),
        value.dims(),
        value.qubits()
    );

    if normalize && value.shape() != Shape::Operator {
        normalize_best_effort(&mut value);
    }
    Ok(value.format(spec))
}

/// Normalize `value`, keeping it unchanged if normalization fails.
///
/// Returns whether normalization succeeded.
pub fn normalize_best_effort(value: &mut Value) -> bool {
    match value.normalize() {
        Ok(_) => true,
        Err(e) => {
            debug!("Skipping normalization: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_notation() {
        assert_eq!(evaluate_notation("<1|1>", false).unwrap(), "1");
        assert_eq!(evaluate_notation("2|1>", true).unwrap(), "|1>");
        assert_eq!(evaluate_notation("-3", true).unwrap(), "-1");
    }

    #[test]
    fn test_operators_are_not_normalized() {
        assert_eq!(evaluate_notation("2|0><0|", true).unwrap(), "2|0><0|");
    }

    #[test]
    fn test_parse_errors_surface() {
        assert!(matches!(
            evaluate_notation("|0> +", false),
            Err(DiracError::Parse(_))
        ));
    }

    #[test]
    fn test_normalize_best_effort() {
        let mut op = Value::parse("|0><1|").unwrap();
        let before = op.clone();
        assert!(!normalize_best_effort(&mut op));
        assert_eq!(op, before);

        let mut ket = Value::parse("3|1>").unwrap();
        assert!(normalize_best_effort(&mut ket));
        assert_eq!(ket.to_string(), "|1>");
    }

    #[test]
    fn test_other_styles() {
        let unicode = evaluate_notation_with("i|1><1|", false, &FormatSpec::unicode()).unwrap();
        assert_eq!(unicode, "ⅈ|1〉〈1|");
        let wide = evaluate_notation_with("|1>", false, &FormatSpec::ascii().with_min_qubits(2));
        assert_eq!(wide.unwrap(), "|01>");
    }
}
