//! Spectral and linear-algebra properties of a square matrix.
//!
//! `analyze_spectrum` computes determinant, trace, eigen-decomposition,
//! rank, norms, condition number, singular values and a fixed set of
//! matrix powers. Each metric is computed independently: a metric that
//! cannot be evaluated (singular matrix, non-convergent decomposition)
//! is reported as `Outcome::Failed` while the rest of the bundle is
//! returned normally.

use nalgebra::{Complex, DMatrix};

use super::linalg;
use crate::types::{dmatrix_to_rows, MarkovError, MarkovResult, Outcome, TransitionMatrix};

/// Exponents reported in `SpectralProperties::powers`.
pub const POWER_EXPONENTS: [u32; 4] = [2, 3, 5, 10];

/// Eigenvalues sorted by descending modulus.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EigenvalueSummary {
    /// Real parts.
    pub real: Vec<f64>,
    /// Imaginary parts.
    pub imaginary: Vec<f64>,
    /// Moduli (descending).
    pub moduli: Vec<f64>,
    /// Real part of the largest-modulus eigenvalue.
    pub dominant: f64,
}

/// Eigenvectors matched to `EigenvalueSummary` order (real parts, unit norm).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EigenvectorSummary {
    /// `vectors[k]` belongs to eigenvalue `k`.
    pub vectors: Vec<Vec<f64>>,
    /// Eigenvector of the dominant eigenvalue.
    pub dominant: Vec<f64>,
}

/// Eigenvalue / eigenvector pairs ordered by descending eigenvalue modulus.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EigenDecomposition {
    /// Eigenvalues.
    pub eigenvalues: EigenvalueSummary,
    /// Eigenvectors.
    pub eigenvectors: EigenvectorSummary,
}

/// Standard matrix norms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixNorms {
    /// Frobenius norm.
    pub frobenius: f64,
    /// Spectral (2-) norm; `None` when the SVD failed.
    pub spectral: Option<f64>,
    /// Infinity norm (max absolute row sum).
    pub infinity: f64,
    /// 1-norm (max absolute column sum).
    pub one: f64,
}

/// Singular value summary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvdSummary {
    /// Singular values, descending.
    pub singular_values: Vec<f64>,
    /// Largest singular value.
    pub max: f64,
    /// Smallest singular value.
    pub min: f64,
}

/// `T^exponent`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixPower {
    /// Exponent.
    pub exponent: u32,
    /// Row-major power matrix.
    pub matrix: Vec<Vec<f64>>,
}

/// Full linear-algebra bundle for one matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectralProperties {
    /// Determinant.
    pub determinant: Outcome<f64>,
    /// Trace.
    pub trace: f64,
    /// Eigen-decomposition.
    pub eigen: Outcome<EigenDecomposition>,
    /// Numerical rank.
    pub rank: Outcome<usize>,
    /// Norms.
    pub norms: MatrixNorms,
    /// 2-norm condition number.
    pub condition_number: Outcome<f64>,
    /// Singular values.
    pub svd: Outcome<SvdSummary>,
    /// Powers at `POWER_EXPONENTS`.
    pub powers: Outcome<Vec<MatrixPower>>,
}

impl SpectralProperties {
    /// Power matrix for `exponent`, if it was computed.
    pub fn power(&self, exponent: u32) -> Option<&[Vec<f64>]> {
        self.powers
            .value()?
            .iter()
            .find(|p| p.exponent == exponent)
            .map(|p| p.matrix.as_slice())
    }
}

/// Compute every spectral metric of `matrix`.
///
/// # Examples
/// ```
/// use markov_core::math::spectral::analyze_spectrum;
/// use markov_core::types::TransitionMatrix;
///
/// let t = TransitionMatrix::from_rows(&[vec![0.9, 0.1], vec![0.0, 1.0]]).unwrap();
/// let spectrum = analyze_spectrum(&t);
/// assert!((spectrum.trace - 1.9).abs() < 1e-12);
/// assert!((spectrum.determinant.value().unwrap() - 0.9).abs() < 1e-12);
/// ```
pub fn analyze_spectrum(matrix: &TransitionMatrix) -> SpectralProperties {
    let a = matrix.as_dmatrix();
    let singular = linalg::singular_values(a);

    let norms = MatrixNorms {
        frobenius: a.norm(),
        spectral: singular.as_ref().ok().and_then(|s| s.first().copied()),
        infinity: a
            .row_iter()
            .map(|r| r.iter().map(|x| x.abs()).sum::<f64>())
            .fold(0.0, f64::max),
        one: a
            .column_iter()
            .map(|c| c.iter().map(|x| x.abs()).sum::<f64>())
            .fold(0.0, f64::max),
    };

    SpectralProperties {
        determinant: Outcome::capture("determinant", || determinant(a)),
        trace: a.trace(),
        eigen: Outcome::capture("eigen", || eigen_decomposition(a)),
        rank: Outcome::capture("rank", || {
            singular
                .clone()
                .map(|s| linalg::rank_from_singular_values(&s))
        }),
        norms,
        condition_number: Outcome::capture("condition_number", || {
            condition_number(singular.clone()?)
        }),
        svd: Outcome::capture("svd", || svd_summary(singular.clone()?)),
        powers: Outcome::capture("powers", || powers(a)),
    }
}

fn determinant(a: &DMatrix<f64>) -> MarkovResult<f64> {
    let det = a.determinant();
    if !det.is_finite() {
        return Err(MarkovError::Numerical(
            "determinant is not finite".to_string(),
        ));
    }
    Ok(det)
}

/// Eigenvalues sorted by descending modulus with matching eigenvectors.
pub fn eigen_decomposition(a: &DMatrix<f64>) -> MarkovResult<EigenDecomposition> {
    let mut values = linalg::complex_eigenvalues(a)?;
    values.sort_by(|x, y| y.norm().total_cmp(&x.norm()));

    let mut vectors = Vec::with_capacity(values.len());
    for k in 0..values.len() {
        let v = linalg::eigenvector(a, values[k], linalg::repeat_index(&values, k))?;
        vectors.push(v.iter().map(|c| c.re).collect::<Vec<f64>>());
    }

    let dominant_value = values
        .first()
        .copied()
        .unwrap_or_else(|| Complex::new(0.0, 0.0));
    let dominant_vector = vectors.first().cloned().unwrap_or_default();

    Ok(EigenDecomposition {
        eigenvalues: EigenvalueSummary {
            real: values.iter().map(|c| c.re).collect(),
            imaginary: values.iter().map(|c| c.im).collect(),
            moduli: values.iter().map(|c| c.norm()).collect(),
            dominant: dominant_value.re,
        },
        eigenvectors: EigenvectorSummary {
            vectors,
            dominant: dominant_vector,
        },
    })
}

fn condition_number(singular: Vec<f64>) -> MarkovResult<f64> {
    let n = singular.len();
    if linalg::rank_from_singular_values(&singular) < n {
        return Err(MarkovError::Numerical(
            "matrix is singular; condition number is unbounded".to_string(),
        ));
    }
    match (singular.first(), singular.last()) {
        (Some(&max), Some(&min)) => Ok(max / min),
        _ => Err(MarkovError::InvalidInput("empty matrix".to_string())),
    }
}

fn svd_summary(singular: Vec<f64>) -> MarkovResult<SvdSummary> {
    let max = singular
        .first()
        .copied()
        .ok_or_else(|| MarkovError::InvalidInput("empty matrix".to_string()))?;
    let min = singular.last().copied().unwrap_or(max);
    Ok(SvdSummary {
        singular_values: singular,
        max,
        min,
    })
}

fn powers(a: &DMatrix<f64>) -> MarkovResult<Vec<MatrixPower>> {
    POWER_EXPONENTS
        .iter()
        .map(|&exponent| {
            let p = linalg::matrix_power(a, exponent);
            if p.iter().any(|x| !x.is_finite()) {
                return Err(MarkovError::Numerical(format!(
                    "matrix power {} overflowed",
                    exponent
                )));
            }
            Ok(MatrixPower {
                exponent,
                matrix: dmatrix_to_rows(&p),
            })
        })
        .collect()
}
