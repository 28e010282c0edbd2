//! Thin wrappers over `nalgebra` decompositions.
//!
//! Every wrapper uses the fallible `try_new` constructors so that a
//! non-convergent decomposition becomes `MarkovError::Numerical` instead of
//! a panic.

use nalgebra::linalg::{Schur, SVD};
use nalgebra::{Complex, DMatrix, DVector};

use crate::types::{MarkovError, MarkovResult};

/// Iteration cap for the Schur and SVD solvers.
pub const MAX_DECOMPOSITION_ITERATIONS: usize = 10_000;

/// Eigenvalues closer than this are treated as one repeated eigenvalue.
const REPEATED_EIGENVALUE_TOLERANCE: f64 = 1e-8;

/// Relative singular value below which a direction of `A - lambda I` counts
/// as part of its null space.
const NULL_SPACE_TOLERANCE: f64 = 1e-10;

/// Eigenvalues of a general real square matrix via real Schur form,
/// in the order produced by the decomposition.
pub fn complex_eigenvalues(a: &DMatrix<f64>) -> MarkovResult<Vec<Complex<f64>>> {
    let schur = Schur::try_new(a.clone(), f64::EPSILON, MAX_DECOMPOSITION_ITERATIONS)
        .ok_or_else(|| {
            MarkovError::Numerical("eigen-decomposition did not converge".to_string())
        })?;
    Ok(schur.complex_eigenvalues().iter().copied().collect())
}

/// Singular values of `a`, sorted in descending order.
pub fn singular_values(a: &DMatrix<f64>) -> MarkovResult<Vec<f64>> {
    let svd = SVD::try_new(
        a.clone(),
        false,
        false,
        f64::EPSILON,
        MAX_DECOMPOSITION_ITERATIONS,
    )
    .ok_or_else(|| MarkovError::Numerical("SVD did not converge".to_string()))?;
    let mut values: Vec<f64> = svd.singular_values.iter().copied().collect();
    values.sort_by(|x, y| y.total_cmp(x));
    Ok(values)
}

/// Numerical rank from descending singular values, using the
/// `max(s) * n * eps` threshold.
pub fn rank_from_singular_values(values: &[f64]) -> usize {
    let Some(&largest) = values.first() else {
        return 0;
    };
    let threshold = largest * values.len() as f64 * f64::EPSILON;
    values.iter().filter(|&&s| s > threshold).count()
}

/// Unit eigenvector of `a` for eigenvalue `lambda`.
///
/// Takes the right singular vector of `a - lambda I` belonging to the
/// `occurrence`-th smallest singular value, so repeated eigenvalues receive
/// distinct vectors. When that singular value is not numerically zero (a
/// defective eigenvalue) the null vector for the smallest one is reused. The phase is fixed so the largest-modulus component is
/// real and positive.
pub fn eigenvector(
    a: &DMatrix<f64>,
    lambda: Complex<f64>,
    occurrence: usize,
) -> MarkovResult<DVector<Complex<f64>>> {
    let n = a.nrows();
    let shifted = DMatrix::from_fn(n, n, |i, j| {
        let diag = if i == j { lambda } else { Complex::new(0.0, 0.0) };
        Complex::new(a[(i, j)], 0.0) - diag
    });

    let svd = SVD::try_new(
        shifted,
        false,
        true,
        f64::EPSILON,
        MAX_DECOMPOSITION_ITERATIONS,
    )
    .ok_or_else(|| MarkovError::Numerical("eigenvector SVD did not converge".to_string()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| MarkovError::Numerical("right singular vectors missing".to_string()))?;

    let s = &svd.singular_values;
    let mut order: Vec<usize> = (0..s.len()).collect();
    order.sort_by(|&x, &y| s[x].total_cmp(&s[y]));
    // A defective eigenvalue has fewer null directions than its multiplicity;
    // past the null space the singular vector is not an eigenvector.
    let tolerance = s.max().max(1.0) * NULL_SPACE_TOLERANCE;
    let candidate = order[occurrence.min(order.len() - 1)];
    let row = if s[candidate] <= tolerance {
        candidate
    } else {
        order[0]
    };

    // Rows of V^H are conjugated right singular vectors.
    let mut v: DVector<Complex<f64>> =
        DVector::from_iterator(n, v_t.row(row).iter().map(|c| c.conj()));

    let pivot = v
        .iter()
        .copied()
        .max_by(|x, y| x.norm().total_cmp(&y.norm()))
        .unwrap_or(Complex::new(1.0, 0.0));
    if pivot.norm() > 0.0 {
        let phase = pivot.conj() / pivot.norm();
        v.iter_mut().for_each(|c| *c *= phase);
    }
    Ok(v)
}

/// How many earlier entries of `values` equal `values[k]` (within tolerance).
pub fn repeat_index(values: &[Complex<f64>], k: usize) -> usize {
    values[..k]
        .iter()
        .filter(|v| (**v - values[k]).norm() < REPEATED_EIGENVALUE_TOLERANCE)
        .count()
}

/// Integer power by repeated squaring. `exponent == 0` yields the identity.
pub fn matrix_power(a: &DMatrix<f64>, exponent: u32) -> DMatrix<f64> {
    let n = a.nrows();
    let mut result = DMatrix::<f64>::identity(n, n);
    let mut base = a.clone();
    let mut e = exponent;
    while e > 0 {
        if e & 1 == 1 {
            result = &result * &base;
        }
        e >>= 1;
        if e > 0 {
            base = &base * &base;
        }
    }
    result
}

/// Inverse of `a`, or a `Numerical` error naming `what` when it is singular.
pub fn inverse(a: &DMatrix<f64>, what: &str) -> MarkovResult<DMatrix<f64>> {
    let inv = a
        .clone()
        .try_inverse()
        .ok_or_else(|| MarkovError::singular(what))?;
    if inv.iter().any(|x| !x.is_finite()) {
        return Err(MarkovError::singular(what));
    }
    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_complex_eigenvalues_triangular() {
        let a = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.0, 1.0]);
        let mut values: Vec<f64> = complex_eigenvalues(&a).unwrap().iter().map(|c| c.re).collect();
        values.sort_by(|x, y| x.total_cmp(y));
        assert_relative_eq!(values[0], 0.9, epsilon = 1e-12);
        assert_relative_eq!(values[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_complex_eigenvalues_rotation() {
        // Period-2 swap has eigenvalues +1 and -1.
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let values = complex_eigenvalues(&a).unwrap();
        let mut re: Vec<f64> = values.iter().map(|c| c.re).collect();
        re.sort_by(|x, y| x.total_cmp(y));
        assert_relative_eq!(re[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(re[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_values_descending() {
        let a = DMatrix::from_row_slice(2, 2, &[3.0, 0.0, 0.0, 4.0]);
        let s = singular_values(&a).unwrap();
        assert_relative_eq!(s[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(s[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rank() {
        assert_eq!(rank_from_singular_values(&[2.0, 1.0, 0.0]), 2);
        assert_eq!(rank_from_singular_values(&[2.0, 1.0, 1e-20]), 2);
        assert_eq!(rank_from_singular_values(&[]), 0);
        assert_eq!(rank_from_singular_values(&[0.0, 0.0]), 0);
    }

    #[test]
    fn test_eigenvector_satisfies_definition() {
        let a = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.0, 1.0]);
        let lambda = Complex::new(0.9, 0.0);
        let v = eigenvector(&a, lambda, 0).unwrap();
        let ac = a.map(|x| Complex::new(x, 0.0));
        let residual = &ac * &v - v.map(|c| c * lambda);
        assert!(residual.norm() < 1e-10);
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_eigenvector_repeated_eigenvalue_distinct() {
        let a = DMatrix::<f64>::identity(2, 2);
        let one = Complex::new(1.0, 0.0);
        let v0 = eigenvector(&a, one, 0).unwrap();
        let v1 = eigenvector(&a, one, 1).unwrap();
        let overlap = v0.dotc(&v1).norm();
        assert!(overlap < 1e-10);
    }

    #[test]
    fn test_eigenvector_defective_eigenvalue_reuses_null_vector() {
        // Eigenvalue 0 has algebraic multiplicity 2 but a single eigenvector e1.
        let a = DMatrix::from_row_slice(3, 3, &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        let zero = Complex::new(0.0, 0.0);
        let ac = a.map(|x| Complex::new(x, 0.0));
        for occurrence in 0..2 {
            let v = eigenvector(&a, zero, occurrence).unwrap();
            assert!((&ac * &v).norm() < 1e-8);
            assert_relative_eq!(v[0].re, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_repeat_index() {
        let values = vec![
            Complex::new(1.0, 0.0),
            Complex::new(0.5, 0.0),
            Complex::new(1.0, 0.0),
        ];
        assert_eq!(repeat_index(&values, 0), 0);
        assert_eq!(repeat_index(&values, 1), 0);
        assert_eq!(repeat_index(&values, 2), 1);
    }

    #[test]
    fn test_matrix_power() {
        let a = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.0, 1.0]);
        let p = matrix_power(&a, 2);
        assert_relative_eq!(p[(0, 0)], 0.81, epsilon = 1e-12);
        assert_relative_eq!(p[(0, 1)], 0.19, epsilon = 1e-12);
        let p10 = matrix_power(&a, 10);
        assert_relative_eq!(p10[(0, 0)], 0.9_f64.powi(10), epsilon = 1e-12);
        assert_eq!(matrix_power(&a, 0), DMatrix::identity(2, 2));
    }

    #[test]
    fn test_inverse_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let err = inverse(&a, "matrix").unwrap_err();
        assert!(matches!(err, MarkovError::Numerical(_)));
    }

    #[test]
    fn test_inverse_regular() {
        let a = DMatrix::from_row_slice(1, 1, &[0.1]);
        let inv = inverse(&a, "I - Q").unwrap();
        assert_relative_eq!(inv[(0, 0)], 10.0, epsilon = 1e-12);
    }
}
