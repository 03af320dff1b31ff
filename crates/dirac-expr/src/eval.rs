//! Evaluation of expression trees to complex scalars and matrices.

use ndarray::{Array2, ArrayView2, Axis, concatenate};
use num_complex::Complex64;
use std::f64::consts::{E, PI};

use crate::ast::{BinOp, Constant, Expression, Function};
use crate::error::{EvalError, EvalResult};
use crate::parser::parse_expression;

/// Largest number of entries a matrix result may have.
pub const MAX_ELEMENTS: usize = 1 << 22;

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    /// A complex number.
    Scalar(Complex64),
    /// A dense complex matrix.
    Matrix(Array2<Complex64>),
}

impl Evaluated {
    /// Dimensions as `(rows, cols)`; a scalar is `(1, 1)`.
    pub fn dims(&self) -> (usize, usize) {
        match self {
            Evaluated::Scalar(_) => (1, 1),
            Evaluated::Matrix(m) => m.dim(),
        }
    }

    /// The scalar value, if this is a scalar or a 1×1 matrix.
    pub fn as_scalar(&self) -> Option<Complex64> {
        match self {
            Evaluated::Scalar(c) => Some(*c),
            Evaluated::Matrix(m) if m.dim() == (1, 1) => Some(m[[0, 0]]),
            Evaluated::Matrix(_) => None,
        }
    }

    /// Turn a 1×1 matrix into a scalar.
    #[must_use]
    pub fn squeeze(self) -> Self {
        match self.as_scalar() {
            Some(c) => Evaluated::Scalar(c),
            None => self,
        }
    }

    /// Convert into a matrix; a scalar becomes 1×1.
    pub fn into_matrix(self) -> Array2<Complex64> {
        match self {
            Evaluated::Scalar(c) => Array2::from_elem((1, 1), c),
            Evaluated::Matrix(m) => m,
        }
    }

    fn map(self, f: impl Fn(Complex64) -> Complex64) -> Self {
        match self {
            Evaluated::Scalar(c) => Evaluated::Scalar(f(c)),
            Evaluated::Matrix(m) => Evaluated::Matrix(m.mapv(f)),
        }
    }
}

impl From<Complex64> for Evaluated {
    fn from(c: Complex64) -> Self {
        Evaluated::Scalar(c)
    }
}

impl From<Array2<Complex64>> for Evaluated {
    fn from(m: Array2<Complex64>) -> Self {
        Evaluated::Matrix(m)
    }
}

/// Parse and evaluate a source string.
pub fn evaluate(source: &str) -> EvalResult<Evaluated> {
    let expr = parse_expression(source)?;
    let value = eval_expression(&expr)?;
    tracing::trace!(dims = ?value.dims(), "evaluated expression");
    Ok(value.squeeze())
}

/// Evaluate an already parsed expression.
pub fn eval_expression(expr: &Expression) -> EvalResult<Evaluated> {
    match expr {
        Expression::Number(v) => Ok(Evaluated::Scalar(Complex64::new(*v, 0.0))),
        Expression::Constant(c) => Ok(Evaluated::Scalar(constant_value(*c))),
        Expression::Neg(e) => Ok(eval_expression(e)?.map(|v| -v)),
        Expression::Paren(e) => eval_expression(e),
        Expression::BinOp { left, op, right } => {
            let l = eval_expression(left)?;
            let r = eval_expression(right)?;
            eval_binary(*op, l, r)
        }
        Expression::FnCall { function, args } => {
            if args.len() != function.arity() {
                return Err(EvalError::WrongArgumentCount {
                    name: function.name().to_string(),
                    expected: function.arity(),
                    got: args.len(),
                });
            }
            let arg = eval_expression(&args[0])?;
            Ok(apply_function(*function, arg))
        }
        Expression::Matrix(rows) => eval_matrix_literal(rows),
    }
}

fn constant_value(c: Constant) -> Complex64 {
    match c {
        Constant::Pi => Complex64::new(PI, 0.0),
        Constant::E => Complex64::new(E, 0.0),
        Constant::I => Complex64::i(),
    }
}

fn eval_binary(op: BinOp, left: Evaluated, right: Evaluated) -> EvalResult<Evaluated> {
    let left = left.squeeze();
    let right = right.squeeze();
    let result = match op {
        BinOp::Add => elementwise(op, left, right, |a, b| a + b)?,
        BinOp::Sub => elementwise(op, left, right, |a, b| a - b)?,
        BinOp::Mul => multiply(left, right)?,
        BinOp::Div => divide(left, right)?,
        BinOp::Pow => power(left, right)?,
    };
    Ok(result.squeeze())
}

/// Addition-like operation; a scalar operand is broadcast over a matrix.
fn elementwise(
    op: BinOp,
    left: Evaluated,
    right: Evaluated,
    f: impl Fn(Complex64, Complex64) -> Complex64,
) -> EvalResult<Evaluated> {
    match (left, right) {
        (Evaluated::Scalar(a), Evaluated::Scalar(b)) => Ok(Evaluated::Scalar(f(a, b))),
        (Evaluated::Scalar(a), Evaluated::Matrix(m)) => {
            Ok(Evaluated::Matrix(m.mapv(|b| f(a, b))))
        }
        (Evaluated::Matrix(m), Evaluated::Scalar(b)) => {
            Ok(Evaluated::Matrix(m.mapv(|a| f(a, b))))
        }
        (Evaluated::Matrix(a), Evaluated::Matrix(b)) => {
            if a.dim() != b.dim() {
                return Err(EvalError::DimensionMismatch {
                    op: op.symbol(),
                    left: a.dim(),
                    right: b.dim(),
                });
            }
            let mut out = a;
            out.zip_mut_with(&b, |x, &y| *x = f(*x, y));
            Ok(Evaluated::Matrix(out))
        }
    }
}

fn multiply(left: Evaluated, right: Evaluated) -> EvalResult<Evaluated> {
    match (left, right) {
        (Evaluated::Scalar(a), other) | (other, Evaluated::Scalar(a)) => Ok(other.map(|v| a * v)),
        (Evaluated::Matrix(a), Evaluated::Matrix(b)) => {
            if a.ncols() != b.nrows() {
                return Err(EvalError::DimensionMismatch {
                    op: BinOp::Mul.symbol(),
                    left: a.dim(),
                    right: b.dim(),
                });
            }
            check_size(a.nrows(), b.ncols())?;
            Ok(Evaluated::Matrix(a.dot(&b)))
        }
    }
}

fn check_size(rows: usize, cols: usize) -> EvalResult<()> {
    match rows.checked_mul(cols) {
        Some(n) if n <= MAX_ELEMENTS => Ok(()),
        _ => Err(EvalError::TooLarge {
            rows,
            cols,
            limit: MAX_ELEMENTS,
        }),
    }
}

fn divide(left: Evaluated, right: Evaluated) -> EvalResult<Evaluated> {
    match right {
        Evaluated::Scalar(d) => {
            if d.norm() == 0.0 {
                return Err(EvalError::Domain("division by zero".into()));
            }
            Ok(left.map(|v| v / d))
        }
        Evaluated::Matrix(m) => Err(EvalError::Domain(format!(
            "cannot divide by a {}x{} matrix",
            m.nrows(),
            m.ncols()
        ))),
    }
}

fn power(base: Evaluated, exponent: Evaluated) -> EvalResult<Evaluated> {
    let Evaluated::Scalar(exp) = exponent else {
        return Err(EvalError::Domain("exponent must be a scalar".into()));
    };
    match base {
        Evaluated::Scalar(b) => Ok(Evaluated::Scalar(complex_pow(b, exp))),
        Evaluated::Matrix(m) => {
            let n = integer_exponent(exp).filter(|n| *n >= 0).ok_or_else(|| {
                EvalError::Domain("matrix power needs a non-negative integer exponent".into())
            })?;
            if m.nrows() != m.ncols() {
                return Err(EvalError::DimensionMismatch {
                    op: BinOp::Pow.symbol(),
                    left: m.dim(),
                    right: (1, 1),
                });
            }
            Ok(Evaluated::Matrix(matrix_pow(m, n.unsigned_abs())))
        }
    }
}

/// `m^n` by repeated squaring.
fn matrix_pow(mut m: Array2<Complex64>, mut n: u32) -> Array2<Complex64> {
    let mut acc = Array2::from_diag_elem(m.nrows(), Complex64::new(1.0, 0.0));
    while n > 0 {
        if n & 1 == 1 {
            acc = acc.dot(&m);
        }
        n >>= 1;
        if n > 0 {
            m = m.dot(&m);
        }
    }
    acc
}

#[allow(clippy::cast_possible_truncation)]
fn integer_exponent(exp: Complex64) -> Option<i32> {
    let is_integer = exp.im == 0.0 && exp.re.fract() == 0.0 && exp.re.abs() <= f64::from(i32::MAX);
    is_integer.then_some(exp.re as i32)
}

/// Complex power that stays exact for integer and real exponents.
fn complex_pow(base: Complex64, exp: Complex64) -> Complex64 {
    if let Some(n) = integer_exponent(exp) {
        return base.powi(n);
    }
    if exp.im == 0.0 {
        if base.norm() == 0.0 {
            return Complex64::new(0.0, 0.0);
        }
        return base.powf(exp.re);
    }
    base.powc(exp)
}

fn apply_function(function: Function, arg: Evaluated) -> Evaluated {
    match function {
        Function::Sqrt => arg.map(Complex64::sqrt),
        Function::Exp => arg.map(Complex64::exp),
        Function::Log => arg.map(Complex64::ln),
        Function::Sin => arg.map(Complex64::sin),
        Function::Cos => arg.map(Complex64::cos),
        Function::Tan => arg.map(Complex64::tan),
        Function::Asin => arg.map(Complex64::asin),
        Function::Acos => arg.map(Complex64::acos),
        Function::Atan => arg.map(Complex64::atan),
        Function::Sinh => arg.map(Complex64::sinh),
        Function::Cosh => arg.map(Complex64::cosh),
        Function::Tanh => arg.map(Complex64::tanh),
        Function::Abs => arg.map(|v| Complex64::new(v.norm(), 0.0)),
        Function::Arg => arg.map(|v| Complex64::new(v.arg(), 0.0)),
        Function::Re => arg.map(|v| Complex64::new(v.re, 0.0)),
        Function::Im => arg.map(|v| Complex64::new(v.im, 0.0)),
        Function::Conj => arg.map(|v| v.conj()),
        Function::Transpose => transpose(arg),
        Function::CTranspose => transpose(arg).map(|v| v.conj()),
    }
}

fn transpose(arg: Evaluated) -> Evaluated {
    match arg {
        Evaluated::Scalar(c) => Evaluated::Scalar(c),
        Evaluated::Matrix(m) => Evaluated::Matrix(m.reversed_axes()),
    }
}

/// Build a matrix from a literal.
///
/// `;` separates rows and `,` separates entries. Entries may themselves be
/// matrices, which are joined as blocks. A comma-only literal whose entries
/// are all literals (`[[1, 0], [0, 1]]`) stacks them as rows instead.
fn eval_matrix_literal(rows: &[Vec<Expression>]) -> EvalResult<Evaluated> {
    let nested = rows.len() == 1
        && rows[0].len() > 1
        && rows[0].iter().all(|e| matches!(e, Expression::Matrix(_)));

    if nested {
        let blocks = rows[0]
            .iter()
            .map(|e| eval_expression(e).map(Evaluated::into_matrix))
            .collect::<EvalResult<Vec<_>>>()?;
        return join(Axis(0), &blocks).map(Evaluated::Matrix);
    }

    let mut row_blocks = Vec::with_capacity(rows.len());
    for row in rows {
        let blocks = row
            .iter()
            .map(|e| eval_expression(e).map(Evaluated::into_matrix))
            .collect::<EvalResult<Vec<_>>>()?;
        row_blocks.push(join(Axis(1), &blocks)?);
    }
    join(Axis(0), &row_blocks).map(Evaluated::Matrix)
}

fn join(axis: Axis, blocks: &[Array2<Complex64>]) -> EvalResult<Array2<Complex64>> {
    let (rows, cols) = blocks.iter().fold((0usize, 0usize), |(r, c), b| match axis {
        Axis(0) => (r.saturating_add(b.nrows()), c.max(b.ncols())),
        _ => (r.max(b.nrows()), c.saturating_add(b.ncols())),
    });
    check_size(rows, cols)?;
    let views: Vec<ArrayView2<'_, Complex64>> = blocks.iter().map(Array2::view).collect();
    concatenate(axis, &views).map_err(|e| {
        let dims: Vec<_> = blocks.iter().map(Array2::dim).collect();
        EvalError::RaggedMatrix(format!("{e}: blocks {dims:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn scalar(source: &str) -> Complex64 {
        match evaluate(source).unwrap() {
            Evaluated::Scalar(c) => c,
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    fn matrix(source: &str) -> Array2<Complex64> {
        match evaluate(source).unwrap() {
            Evaluated::Matrix(m) => m,
            other => panic!("expected matrix, got {other:?}"),
        }
    }

    #[test]
    fn test_real_arithmetic() {
        assert!((scalar("1 + 2 * 3").re - 7.0).abs() < EPS);
        assert!((scalar("(1 + 2) * 3").re - 9.0).abs() < EPS);
        assert!((scalar("2^3^2").re - 512.0).abs() < EPS);
        assert!((scalar("-2^2").re + 4.0).abs() < EPS);
        assert!((scalar("1/4").re - 0.25).abs() < EPS);
    }

    #[test]
    fn test_imaginary_unit() {
        let c = scalar("1 - i");
        assert!((c.re - 1.0).abs() < EPS && (c.im + 1.0).abs() < EPS);
        let c = scalar("i * i");
        assert!((c.re + 1.0).abs() < EPS && c.im.abs() < EPS);
        let c = scalar("2i");
        assert!((c.im - 2.0).abs() < EPS);
    }

    #[test]
    fn test_trigonometry() {
        let c = scalar("sin(pi/4)");
        assert!((c.re - std::f64::consts::FRAC_1_SQRT_2).abs() < EPS);
        let c = scalar("cos(pi)");
        assert!((c.re + 1.0).abs() < EPS);
    }

    #[test]
    fn test_sqrt_of_negative_is_imaginary() {
        let c = scalar("sqrt(-4)");
        assert!(c.re.abs() < EPS && (c.im - 2.0).abs() < EPS);
    }

    #[test]
    fn test_column_and_row_literals() {
        assert_eq!(matrix("[1; 0; 0]").dim(), (3, 1));
        assert_eq!(matrix("[1, 0, 0]").dim(), (1, 3));
        assert_eq!(matrix("[[1, 0], [0, 1]]").dim(), (2, 2));
        assert_eq!(matrix("[[1, 2, 3]]").dim(), (1, 3));
    }

    #[test]
    fn test_conjugate_transpose() {
        let m = matrix("conj(transpose([1; i]))");
        assert_eq!(m.dim(), (1, 2));
        assert!((m[[0, 1]].im + 1.0).abs() < EPS);
        assert_eq!(m, matrix("ctranspose([1; i])"));
    }

    #[test]
    fn test_inner_product_squeezes() {
        let c = scalar("[0, 1] [0; 1]");
        assert!((c.re - 1.0).abs() < EPS);
    }

    #[test]
    fn test_outer_product() {
        let m = matrix("([1; 0] + [0; 1]) ([1, 0] + [0, 1])");
        assert_eq!(m.dim(), (2, 2));
        assert!(m.iter().all(|v| (v.re - 1.0).abs() < EPS));
    }

    #[test]
    fn test_scalar_matrix_product() {
        let m = matrix("sin(pi/4) ([1; 0]) + cos(pi/4) ([0; 1])");
        assert!((m[[0, 0]].re - std::f64::consts::FRAC_1_SQRT_2).abs() < EPS);
        assert!((m[[1, 0]].re - std::f64::consts::FRAC_1_SQRT_2).abs() < EPS);
    }

    #[test]
    fn test_matrix_power() {
        let m = matrix("[0, 1; 1, 0]^2");
        assert!((m[[0, 0]].re - 1.0).abs() < EPS);
        assert!(m[[0, 1]].norm() < EPS);
    }

    #[test]
    fn test_matrix_power_by_squaring() {
        let m = matrix("[1, 1; 0, 1]^13");
        assert!((m[[0, 1]].re - 13.0).abs() < EPS);
        assert!((m[[1, 1]].re - 1.0).abs() < EPS);

        let id = matrix("[1, 0; 0, 1]^2000000000");
        assert!((id[[0, 0]].re - 1.0).abs() < EPS);
        assert!(id[[1, 0]].norm() < EPS);

        let zero = matrix("[0, 1; 1, 0]^0");
        assert!((zero[[0, 0]].re - 1.0).abs() < EPS);
    }

    #[test]
    fn test_size_limit() {
        assert!(check_size(2048, 2048).is_ok());
        assert!(matches!(
            check_size(65536, 65536),
            Err(EvalError::TooLarge { rows: 65536, .. })
        ));
        assert!(check_size(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_oversized_outer_product_is_rejected() {
        let column = format!("[{}]", vec!["1"; 4096].join("; "));
        let row = format!("[{}]", vec!["1"; 4096].join(", "));
        assert!(matches!(
            evaluate(&format!("{column} {row}")),
            Err(EvalError::TooLarge { rows: 4096, cols: 4096, .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(matches!(
            evaluate("[1; 0] + [1; 0; 0]"),
            Err(EvalError::DimensionMismatch { op: "+", .. })
        ));
        assert!(matches!(
            evaluate("[1; 0] [1; 0]"),
            Err(EvalError::DimensionMismatch { op: "*", .. })
        ));
    }

    #[test]
    fn test_ragged_literal() {
        assert!(matches!(
            evaluate("[1, 2; 3]"),
            Err(EvalError::RaggedMatrix(_))
        ));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(evaluate("1 / 0"), Err(EvalError::Domain(_))));
    }

    #[test]
    fn test_unknown_identifier() {
        assert!(matches!(
            evaluate("x + 1"),
            Err(EvalError::UnknownIdentifier(name)) if name == "x"
        ));
    }

    #[test]
    fn test_wrong_argument_count() {
        assert!(matches!(
            evaluate("sin(1, 2)"),
            Err(EvalError::WrongArgumentCount { got: 2, .. })
        ));
    }
}
