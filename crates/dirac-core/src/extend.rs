//! Zero-padding of operands declared over different numbers of qubits.

use ndarray::{Array2, s};
use num_complex::Complex64;

/// Grow `a` to at least `rows × cols`, keeping every entry in place and
/// filling new cells with zero. Never shrinks.
pub fn resize(a: &Array2<Complex64>, rows: usize, cols: usize) -> Array2<Complex64> {
    let (ra, ca) = a.dim();
    let rows = rows.max(ra);
    let cols = cols.max(ca);
    if (rows, cols) == (ra, ca) {
        return a.clone();
    }
    let mut out = Array2::zeros((rows, cols));
    out.slice_mut(s![..ra, ..ca]).assign(a);
    out
}

/// Return `a` resized to `max(rows) × max(cols)` of `a` and `b`.
///
/// If either operand is a 1×1 scalar, `a` is returned unchanged: scalar
/// combinations are plain complex arithmetic, not padding.
pub fn extend(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    if is_scalar(a) || is_scalar(b) {
        return a.clone();
    }
    let (rb, cb) = b.dim();
    resize(a, rb, cb)
}

fn is_scalar(m: &Array2<Complex64>) -> bool {
    m.dim() == (1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_extend_ket_by_ket() {
        let a = Array2::from_shape_vec((2, 1), vec![c(1.0), c(2.0)]).unwrap();
        let b = Array2::zeros((4, 1));
        let out = extend(&a, &b);
        assert_eq!(out.dim(), (4, 1));
        assert_eq!(out[[0, 0]], c(1.0));
        assert_eq!(out[[1, 0]], c(2.0));
        assert_eq!(out[[3, 0]], c(0.0));
    }

    #[test]
    fn test_extend_never_shrinks() {
        let a = Array2::from_elem((4, 4), c(1.0));
        let b = Array2::zeros((2, 2));
        assert_eq!(extend(&a, &b).dim(), (4, 4));
    }

    #[test]
    fn test_extend_mixed_axes() {
        let a = Array2::from_elem((4, 2), c(1.0));
        let b = Array2::zeros((2, 8));
        let out = extend(&a, &b);
        assert_eq!(out.dim(), (4, 8));
        assert_eq!(out[[3, 1]], c(1.0));
        assert_eq!(out[[3, 2]], c(0.0));
    }

    #[test]
    fn test_scalar_is_left_alone() {
        let a = Array2::from_elem((1, 1), c(3.0));
        let b = Array2::zeros((4, 1));
        assert_eq!(extend(&a, &b).dim(), (1, 1));
        assert_eq!(extend(&b, &a).dim(), (4, 1));
    }
}
