//! Shape classification of complex arrays.

use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// The four shapes a value can take in Dirac notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// 1×1.
    Scalar,
    /// Row vector, `<label|`.
    Bra,
    /// Column vector, `|label>`.
    Ket,
    /// Matrix with both dimensions above one, `|a><b|` terms.
    Operator,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Scalar => "scalar",
            Shape::Bra => "bra",
            Shape::Ket => "ket",
            Shape::Operator => "operator",
        };
        f.write_str(name)
    }
}

/// Classify a `rows × cols` array.
///
/// Zero-sized dimensions never occur in a value; they are treated as 1.
pub fn classify_dims(rows: usize, cols: usize) -> Shape {
    match (rows > 1, cols > 1) {
        (false, false) => Shape::Scalar,
        (true, false) => Shape::Ket,
        (false, true) => Shape::Bra,
        (true, true) => Shape::Operator,
    }
}

/// Number of binary digits needed to label every basis index of a
/// `rows × cols` array; 0 for a scalar.
pub fn qubits_for_dims(rows: usize, cols: usize) -> u32 {
    let n = rows.max(cols);
    if n <= 1 {
        return 0;
    }
    let mut k = 1;
    while (1_usize << k) < n {
        k += 1;
    }
    k
}

/// Shape of an array.
pub fn classify(matrix: &Array2<Complex64>) -> Shape {
    let (rows, cols) = matrix.dim();
    classify_dims(rows, cols)
}

/// Qubit count of an array.
pub fn qubits(matrix: &Array2<Complex64>) -> u32 {
    let (rows, cols) = matrix.dim();
    qubits_for_dims(rows, cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify_dims(1, 1), Shape::Scalar);
        assert_eq!(classify_dims(2, 1), Shape::Ket);
        assert_eq!(classify_dims(1, 2), Shape::Bra);
        assert_eq!(classify_dims(3, 2), Shape::Operator);
    }

    #[test]
    fn test_qubits() {
        assert_eq!(qubits_for_dims(1, 1), 0);
        assert_eq!(qubits_for_dims(2, 1), 1);
        assert_eq!(qubits_for_dims(3, 1), 2);
        assert_eq!(qubits_for_dims(1, 4), 2);
        assert_eq!(qubits_for_dims(5, 2), 3);
        assert_eq!(qubits_for_dims(8, 8), 3);
        assert_eq!(qubits_for_dims(9, 1), 4);
    }

    #[test]
    fn test_classify_array() {
        let ket = Array2::<Complex64>::zeros((4, 1));
        assert_eq!(classify(&ket), Shape::Ket);
        assert_eq!(qubits(&ket), 2);
        assert_eq!(qubits(&Array2::zeros((1, 1))), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::Operator.to_string(), "operator");
    }
}
