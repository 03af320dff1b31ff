//! Complex values in Dirac notation and their chainable algebra.
//!
//! A [`Value`] wraps one dense complex matrix. Its [`Shape`] is derived from
//! the current dimensions, so every operation that replaces the matrix also
//! reclassifies the value.
//!
//! Operations mutate in place and hand back `&mut Self`, so they chain with
//! `?`:
//!
//! ```rust
//! use dirac_core::Value;
//! use ndarray::array;
//! use num_complex::Complex64;
//!
//! let one = Complex64::new(1.0, 0.0);
//! let zero = Complex64::new(0.0, 0.0);
//!
//! let mut v = Value::new();
//! v.bra(array![[zero, one]]).unwrap().ket(array![[zero], [one]]).unwrap();
//! assert_eq!(v.to_string(), "1");
//! ```

use std::fmt;

use dirac_expr::Evaluated;
use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{DiracError, DiracResult};
use crate::extend::{extend, resize};
use crate::format::{FormatSpec, format};
use crate::notation;
use crate::shape::{Shape, classify, qubits};

/// Argument of an algebra operation: a raw number, a raw matrix, or another
/// value. Every operation normalizes it to a matrix first.
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// A complex number.
    Scalar(Complex64),
    /// A raw matrix.
    Matrix(Array2<Complex64>),
    /// Another value, borrowed.
    Value(&'a Value),
}

impl Operand<'_> {
    /// Normalize to a matrix; a scalar becomes 1×1.
    pub fn into_matrix(self) -> DiracResult<Array2<Complex64>> {
        let m = match self {
            Operand::Scalar(c) => Array2::from_elem((1, 1), c),
            Operand::Matrix(m) => m,
            Operand::Value(v) => v.data.clone(),
        };
        let (rows, cols) = m.dim();
        if rows == 0 || cols == 0 {
            return Err(DiracError::shape_mismatch(
                "non-empty array",
                format!("{rows}x{cols} array"),
            ));
        }
        Ok(m)
    }

    /// Coerce to a complex number.
    pub fn into_scalar(self) -> DiracResult<Complex64> {
        let m = self
            .into_matrix()
            .map_err(|e| DiracError::InvalidScalar(e.to_string()))?;
        if m.dim() != (1, 1) {
            return Err(DiracError::InvalidScalar(format!(
                "expected a number, got a {}x{} {}",
                m.nrows(),
                m.ncols(),
                classify(&m)
            )));
        }
        let c = m[[0, 0]];
        if !c.is_finite() {
            return Err(DiracError::InvalidScalar(format!("{c} is not finite")));
        }
        Ok(c)
    }
}

impl From<f64> for Operand<'_> {
    fn from(v: f64) -> Self {
        Operand::Scalar(Complex64::new(v, 0.0))
    }
}

impl From<Complex64> for Operand<'_> {
    fn from(c: Complex64) -> Self {
        Operand::Scalar(c)
    }
}

impl From<Array2<Complex64>> for Operand<'_> {
    fn from(m: Array2<Complex64>) -> Self {
        Operand::Matrix(m)
    }
}

impl From<Evaluated> for Operand<'_> {
    fn from(e: Evaluated) -> Self {
        match e {
            Evaluated::Scalar(c) => Operand::Scalar(c),
            Evaluated::Matrix(m) => Operand::Matrix(m),
        }
    }
}

impl<'a> From<&'a Value> for Operand<'a> {
    fn from(v: &'a Value) -> Self {
        Operand::Value(v)
    }
}

fn adjoint(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|v| v.conj())
}

/// A scalar, bra, ket or operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    data: Array2<Complex64>,
}

impl Default for Value {
    fn default() -> Self {
        Self::new()
    }
}

impl Value {
    /// The scalar 1, the neutral starting point for a chain.
    pub fn new() -> Self {
        Self::scalar(Complex64::new(1.0, 0.0))
    }

    /// A scalar value.
    pub fn scalar(c: Complex64) -> Self {
        Self {
            data: Array2::from_elem((1, 1), c),
        }
    }

    /// Wrap a raw operand.
    pub fn from_operand<'a>(y: impl Into<Operand<'a>>) -> DiracResult<Self> {
        Ok(Self {
            data: y.into().into_matrix()?,
        })
    }

    /// Parse Dirac notation text.
    pub fn parse(text: &str) -> DiracResult<Self> {
        notation::parse(text)
    }

    /// The value with 1×1 results squeezed to a scalar.
    pub fn get(&self) -> Evaluated {
        Evaluated::Matrix(self.data.clone()).squeeze()
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.data
    }

    /// The scalar, if this value is one.
    pub fn as_scalar(&self) -> Option<Complex64> {
        self.is_scalar().then(|| self.data[[0, 0]])
    }

    /// Dimensions as `(rows, cols)`.
    pub fn dims(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Current shape.
    pub fn shape(&self) -> Shape {
        classify(&self.data)
    }

    pub fn is_scalar(&self) -> bool {
        self.shape() == Shape::Scalar
    }

    pub fn is_bra(&self) -> bool {
        self.shape() == Shape::Bra
    }

    pub fn is_ket(&self) -> bool {
        self.shape() == Shape::Ket
    }

    pub fn is_operator(&self) -> bool {
        self.shape() == Shape::Operator
    }

    /// Qubits needed to label every basis index; 0 for a scalar.
    pub fn qubits(&self) -> u32 {
        qubits(&self.data)
    }

    /// `x + y`, zero-padding both operands to a common size.
    pub fn plus<'a>(&mut self, y: impl Into<Operand<'a>>) -> DiracResult<&mut Self> {
        self.combine(y.into(), "plus", |a, b| a + b)
    }

    /// `x - y`, zero-padding both operands to a common size.
    pub fn minus<'a>(&mut self, y: impl Into<Operand<'a>>) -> DiracResult<&mut Self> {
        self.combine(y.into(), "minus", |a, b| a - b)
    }

    fn combine(
        &mut self,
        y: Operand<'_>,
        operation: &str,
        f: impl Fn(Complex64, Complex64) -> Complex64,
    ) -> DiracResult<&mut Self> {
        let y = y.into_matrix()?;
        let (mine, theirs) = (self.shape(), classify(&y));
        if mine != theirs {
            return Err(DiracError::shape_mismatch(
                format!("{mine} operand for {operation}"),
                theirs,
            ));
        }
        let mut sum = extend(&self.data, &y);
        let other = extend(&y, &self.data);
        sum.zip_mut_with(&other, |a, &b| *a = f(*a, b));
        self.data = sum;
        Ok(self)
    }

    /// Multiply by a complex number.
    pub fn num<'a>(&mut self, n: impl Into<Operand<'a>>) -> DiracResult<&mut Self> {
        let n = n.into().into_scalar()?;
        self.data.mapv_inplace(|v| n * v);
        Ok(self)
    }

    /// Right-multiply by a bra (row vector).
    pub fn bra<'a>(&mut self, b: impl Into<Operand<'a>>) -> DiracResult<&mut Self> {
        let b = b.into().into_matrix()?;
        let found = classify(&b);
        if found != Shape::Bra {
            return Err(DiracError::shape_mismatch("bra", found));
        }
        self.data = self.product(&b)?;
        Ok(self)
    }

    /// Right-multiply by a ket (column vector).
    ///
    /// Unlike [`bra`](Self::bra), the column count of `x` and the row count
    /// of `k` are first padded to their maximum, so a ket over more qubits
    /// than seen so far is absorbed.
    pub fn ket<'a>(&mut self, k: impl Into<Operand<'a>>) -> DiracResult<&mut Self> {
        let mut k = k.into().into_matrix()?;
        let found = classify(&k);
        if found != Shape::Ket {
            return Err(DiracError::shape_mismatch("ket", found));
        }
        if !self.is_scalar() {
            let (rows, cols) = self.dims();
            let n = cols.max(k.nrows());
            self.data = resize(&self.data, rows, n);
            k = resize(&k, n, 1);
        }
        self.data = self.product(&k)?;
        Ok(self)
    }

    /// [`ket`](Self::ket) with a column given as a flat slice.
    pub fn ket_from_array(&mut self, entries: &[Complex64]) -> DiracResult<&mut Self> {
        let column = Array2::from_shape_fn((entries.len(), 1), |(i, _)| entries[i]);
        self.ket(column)
    }

    fn product(&self, rhs: &Array2<Complex64>) -> DiracResult<Array2<Complex64>> {
        if let Some(c) = self.as_scalar() {
            return Ok(rhs.mapv(|v| c * v));
        }
        if self.data.ncols() != rhs.nrows() {
            return Err(DiracError::shape_mismatch(
                format!("operand with {} rows", self.data.ncols()),
                format!("{}x{} {}", rhs.nrows(), rhs.ncols(), classify(rhs)),
            ));
        }
        Ok(self.data.dot(rhs))
    }

    /// Conjugate transpose.
    pub fn dagger(&mut self) -> &mut Self {
        self.data = adjoint(&self.data);
        self
    }

    /// Norm `sqrt(<x|x>)` of a scalar, bra or ket.
    pub fn abs(&self) -> DiracResult<f64> {
        let shape = self.shape();
        let inner = match shape {
            Shape::Operator => {
                return Err(DiracError::Unimplemented {
                    operation: "abs",
                    shape,
                });
            }
            Shape::Ket => adjoint(&self.data).dot(&self.data),
            Shape::Bra | Shape::Scalar => self.data.dot(&adjoint(&self.data)),
        };
        Ok(inner[[0, 0]].re.max(0.0).sqrt())
    }

    /// Scale to unit norm. A zero vector is left unchanged.
    pub fn normalize(&mut self) -> DiracResult<&mut Self> {
        let n = self.abs()?;
        if n != 0.0 {
            self.data.mapv_inplace(|v| v / n);
        }
        Ok(self)
    }

    /// Apply the projector `|p><p| / <p|p>`.
    pub fn project<'a>(&mut self, p: impl Into<Operand<'a>>) -> DiracResult<&mut Self> {
        let p = p.into().into_matrix()?;
        let found = classify(&p);
        if found != Shape::Ket {
            return Err(DiracError::shape_mismatch("ket", found));
        }
        let p_bra = adjoint(&p);
        let bracket = p_bra.dot(&p)[[0, 0]];
        let scale = bracket.inv();
        if bracket.norm() == 0.0 || !scale.is_finite() {
            return Err(DiracError::InvalidScalar(
                "cannot project onto a zero vector".into(),
            ));
        }
        self.ket(p)?.bra(p_bra)?.num(scale)
    }

    /// Render with an explicit format.
    pub fn format(&self, spec: &FormatSpec) -> String {
        format(self, spec)
    }

    /// Render with Unicode brackets and `ⅈ`.
    pub fn to_unicode(&self) -> String {
        format(self, &FormatSpec::unicode())
    }

    /// Render as TeX math.
    pub fn to_tex(&self) -> String {
        format(self, &FormatSpec::tex())
    }

    /// Render as HTML spans.
    pub fn to_html(&self) -> String {
        format(self, &FormatSpec::html())
    }
}

impl From<Evaluated> for Value {
    fn from(e: Evaluated) -> Self {
        Self {
            data: e.into_matrix(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self, &FormatSpec::ascii()))
    }
}
