//! Square transition matrix type.
//!
//! `TransitionMatrix` wraps an `nalgebra::DMatrix<f64>` that is guaranteed
//! to be non-empty, square and finite. Row `i` is indexed by origin state,
//! column `j` by destination state. Row-stochasticity is *not* enforced here;
//! it is a property reported by the analyzers.

use nalgebra::DMatrix;

use super::error::{MarkovError, MarkovResult};

/// Entries above this value count as edges of the transition graph.
pub const EDGE_THRESHOLD: f64 = 1e-10;

/// A state is absorbing when its self-transition is at least `1 - ABSORBING_TOLERANCE`.
pub const ABSORBING_TOLERANCE: f64 = 1e-6;

/// Allowed absolute deviation of a row (or column) sum from 1.
pub const STOCHASTIC_TOLERANCE: f64 = 1e-6;

/// Non-empty square matrix of finite transition weights.
///
/// # Examples
/// ```
/// use markov_core::types::TransitionMatrix;
///
/// let t = TransitionMatrix::from_rows(&[vec![0.9, 0.1], vec![0.0, 1.0]]).unwrap();
/// assert_eq!(t.dim(), 2);
/// assert!(t.is_absorbing(1));
/// assert!(!t.is_absorbing(0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")
)]
pub struct TransitionMatrix {
    inner: DMatrix<f64>,
}

impl TransitionMatrix {
    /// Build from row-major nested vectors.
    ///
    /// # Errors
    /// `InvalidInput` if the table is empty or contains non-finite values,
    /// `DimensionMismatch` if any row length differs from the row count.
    pub fn from_rows(rows: &[Vec<f64>]) -> MarkovResult<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(MarkovError::InvalidInput(
                "transition matrix must have at least one row".to_string(),
            ));
        }
        if let Some(bad) = rows.iter().find(|row| row.len() != n) {
            return Err(MarkovError::DimensionMismatch {
                expected: n,
                actual: bad.len(),
            });
        }
        Self::from_dmatrix(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
    }

    /// Wrap an existing `DMatrix`, validating shape and finiteness.
    pub fn from_dmatrix(inner: DMatrix<f64>) -> MarkovResult<Self> {
        if inner.nrows() == 0 {
            return Err(MarkovError::InvalidInput(
                "transition matrix must have at least one row".to_string(),
            ));
        }
        if !inner.is_square() {
            return Err(MarkovError::DimensionMismatch {
                expected: inner.nrows(),
                actual: inner.ncols(),
            });
        }
        if inner.iter().any(|x| !x.is_finite()) {
            return Err(MarkovError::InvalidInput(
                "transition matrix contains non-finite entries".to_string(),
            ));
        }
        Ok(Self { inner })
    }

    /// The `n x n` identity: every state absorbing.
    pub fn identity(n: usize) -> MarkovResult<Self> {
        Self::from_dmatrix(DMatrix::identity(n, n))
    }

    /// Number of states.
    #[inline]
    pub fn dim(&self) -> usize {
        self.inner.nrows()
    }

    /// Entry `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    /// Borrow the underlying matrix.
    #[inline]
    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.inner
    }

    /// Consume into the underlying matrix.
    pub fn into_dmatrix(self) -> DMatrix<f64> {
        self.inner
    }

    /// Row-major copy as nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        dmatrix_to_rows(&self.inner)
    }

    /// Sum of every row.
    pub fn row_sums(&self) -> Vec<f64> {
        self.inner.row_iter().map(|r| r.sum()).collect()
    }

    /// Sum of every column.
    pub fn column_sums(&self) -> Vec<f64> {
        self.inner.column_iter().map(|c| c.sum()).collect()
    }

    /// True if `i -> j` is an edge of the transition graph.
    #[inline]
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.inner[(i, j)] > EDGE_THRESHOLD
    }

    /// True if state `i` keeps all of its mass.
    #[inline]
    pub fn is_absorbing(&self, i: usize) -> bool {
        self.inner[(i, i)] >= 1.0 - ABSORBING_TOLERANCE
    }

    /// Indices of all absorbing states, ascending.
    pub fn absorbing_indices(&self) -> Vec<usize> {
        (0..self.dim()).filter(|&i| self.is_absorbing(i)).collect()
    }

    /// Ensure `states` labels every row of this matrix.
    pub fn check_labels(&self, states: &[String]) -> MarkovResult<()> {
        if states.len() != self.dim() {
            return Err(MarkovError::DimensionMismatch {
                expected: self.dim(),
                actual: states.len(),
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<f64>>> for TransitionMatrix {
    type Error = MarkovError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<TransitionMatrix> for Vec<Vec<f64>> {
    fn from(matrix: TransitionMatrix) -> Self {
        matrix.to_rows()
    }
}

/// Row-major nested-vector copy of any `DMatrix<f64>`.
pub fn dmatrix_to_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}
