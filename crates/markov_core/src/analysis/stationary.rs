//! Stationary distribution solver.
//!
//! Power iteration from the uniform distribution (`pi <- pi T`) until the
//! Euclidean change drops below the tolerance. If the iteration budget runs
//! out, the eigenvector of `T^T` for the eigenvalue with the largest real part
//! is normalised to sum to 1 instead. Should that vector not be normalisable
//! the last iterate is normalised, so a distribution is always returned for
//! valid input.

use nalgebra::{DMatrix, DVector};

use crate::math::linalg;
use crate::types::{MarkovError, MarkovResult, TransitionMatrix};

/// Configuration for the power-iteration solver.
///
/// # Example
///
/// ```
/// use markov_core::analysis::StationaryConfig;
///
/// let config = StationaryConfig::default();
/// assert_eq!(config.max_iterations, 1000);
///
/// let custom = StationaryConfig {
///     tolerance: 1e-12,
///     max_iterations: 5000,
/// };
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationaryConfig {
    /// Convergence tolerance on `||pi_{n+1} - pi_n||_2`.
    pub tolerance: f64,

    /// Maximum number of power iterations before falling back.
    pub max_iterations: usize,
}

impl Default for StationaryConfig {
    /// Default values:
    /// - `tolerance`: 1e-10
    /// - `max_iterations`: 1000
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 1000,
        }
    }
}

impl StationaryConfig {
    /// Create a new configuration.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        assert!(tolerance > 0.0, "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Tight tolerance (1e-14) and a larger budget (10 000).
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 10_000,
        }
    }

    /// Relaxed tolerance (1e-6) and a small budget (100).
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> MarkovResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(MarkovError::InvalidInput(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(MarkovError::InvalidInput(
                "max_iterations must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// How the returned distribution was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StationaryMethod {
    /// Power iteration converged.
    PowerIteration,
    /// Dominant left eigenvector after power iteration stalled.
    Eigenvector,
    /// Last power iterate, renormalised.
    Normalization,
}

/// Stationary distribution and solver diagnostics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationaryResult {
    /// Probability vector `pi`.
    pub distribution: Vec<f64>,
    /// Power iterations performed.
    pub iterations: usize,
    /// Whether power iteration met the tolerance.
    pub converged: bool,
    /// Method that produced `distribution`.
    pub method: StationaryMethod,
    /// `||pi T - pi||_2` for the returned vector.
    pub residual: f64,
}

/// Long-run distribution of `matrix`.
///
/// # Errors
/// `InvalidInput` for an unusable `config`.
///
/// # Examples
/// ```
/// use markov_core::analysis::{stationary_distribution, StationaryConfig, StationaryMethod};
/// use markov_core::types::TransitionMatrix;
///
/// let t = TransitionMatrix::from_rows(&[vec![0.5, 0.5], vec![0.2, 0.8]]).unwrap();
/// let result = stationary_distribution(&t, &StationaryConfig::default()).unwrap();
/// assert!(result.converged);
/// assert_eq!(result.method, StationaryMethod::PowerIteration);
/// assert!((result.distribution[0] - 2.0 / 7.0).abs() < 1e-8);
/// ```
pub fn stationary_distribution(
    matrix: &TransitionMatrix,
    config: &StationaryConfig,
) -> MarkovResult<StationaryResult> {
    config.validate()?;
    let t = matrix.as_dmatrix();
    let n = matrix.dim();

    let mut pi = DVector::from_element(n, 1.0 / n as f64);
    for iteration in 0..config.max_iterations {
        let next = t.tr_mul(&pi);
        let change = (&next - &pi).norm();
        if change < config.tolerance {
            tracing::debug!(iterations = iteration + 1, "power iteration converged");
            return Ok(finish(t, next, iteration + 1, true, StationaryMethod::PowerIteration));
        }
        pi = next;
    }

    match dominant_left_eigenvector(t) {
        Ok(v) => {
            tracing::debug!(
                max_iterations = config.max_iterations,
                "power iteration stalled; using eigenvector"
            );
            Ok(finish(
                t,
                v,
                config.max_iterations,
                false,
                StationaryMethod::Eigenvector,
            ))
        }
        Err(err) => {
            tracing::warn!(error = %err, "eigenvector fallback failed; normalising last iterate");
            let sum = pi.sum();
            let v = if sum.abs() > f64::EPSILON { pi / sum } else { pi };
            Ok(finish(
                t,
                v,
                config.max_iterations,
                false,
                StationaryMethod::Normalization,
            ))
        }
    }
}

/// Eigenvector of `T^T` for the eigenvalue with the largest real part,
/// scaled to sum to 1.
pub fn dominant_left_eigenvector(t: &DMatrix<f64>) -> MarkovResult<DVector<f64>> {
    let tt = t.transpose();
    let values = linalg::complex_eigenvalues(&tt)?;
    let lambda = values
        .iter()
        .copied()
        .max_by(|x, y| x.re.total_cmp(&y.re))
        .ok_or_else(|| MarkovError::InvalidInput("empty matrix".to_string()))?;
    let v = linalg::eigenvector(&tt, lambda, 0)?;
    let real = DVector::from_iterator(v.len(), v.iter().map(|c| c.re));
    let sum = real.sum();
    if sum.abs() < 1e-12 || !sum.is_finite() {
        return Err(MarkovError::Numerical(
            "dominant eigenvector sums to zero".to_string(),
        ));
    }
    Ok(real / sum)
}

fn finish(
    t: &DMatrix<f64>,
    pi: DVector<f64>,
    iterations: usize,
    converged: bool,
    method: StationaryMethod,
) -> StationaryResult {
    let residual = (t.tr_mul(&pi) - &pi).norm();
    StationaryResult {
        distribution: pi.iter().copied().collect(),
        iterations,
        converged,
        method,
        residual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = StationaryConfig::default();
        assert_relative_eq!(config.tolerance, 1e-10, epsilon = 1e-20);
        assert_eq!(config.max_iterations, 1000);
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_new_config_zero_tolerance_panics() {
        let _ = StationaryConfig::new(0.0, 10);
    }

    #[test]
    #[should_panic(expected = "max_iterations must be > 0")]
    fn test_new_config_zero_iterations_panics() {
        let _ = StationaryConfig::new(1e-10, 0);
    }

    #[test]
    fn test_presets() {
        assert!(StationaryConfig::high_precision().tolerance < 1e-12);
        assert!(StationaryConfig::fast().max_iterations <= 100);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = StationaryConfig {
            tolerance: -1.0,
            max_iterations: 10,
        };
        assert!(bad.validate().is_err());
        let bad = StationaryConfig {
            tolerance: 1e-10,
            max_iterations: 0,
        };
        assert!(bad.validate().is_err());
        let t = TransitionMatrix::identity(2).unwrap();
        assert!(stationary_distribution(&t, &bad).is_err());
    }

    #[test]
    fn test_two_state_chain() {
        let t = TransitionMatrix::from_rows(&[vec![0.5, 0.5], vec![0.2, 0.8]]).unwrap();
        let r = stationary_distribution(&t, &StationaryConfig::default()).unwrap();
        assert!(r.converged);
        assert_relative_eq!(r.distribution[0], 2.0 / 7.0, epsilon = 1e-9);
        assert_relative_eq!(r.distribution[1], 5.0 / 7.0, epsilon = 1e-9);
        assert!(r.residual < 1e-9);
    }

    #[test]
    fn test_credit_chain_absorbs() {
        let t = TransitionMatrix::from_rows(&[
            vec![0.9, 0.08, 0.02],
            vec![0.1, 0.7, 0.2],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        let r = stationary_distribution(&t, &StationaryConfig::default()).unwrap();
        let sum: f64 = r.distribution.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        assert!(r.distribution[2] > 0.99);
    }

    #[test]
    fn test_periodic_chain_falls_back_to_eigenvector() {
        // Bipartite chain: uniform start oscillates forever.
        let t = TransitionMatrix::from_rows(&[
            vec![0.0, 1.0, 0.0],
            vec![0.5, 0.0, 0.5],
            vec![0.0, 1.0, 0.0],
        ])
        .unwrap();
        let r = stationary_distribution(&t, &StationaryConfig::default()).unwrap();
        assert!(!r.converged);
        assert_eq!(r.method, StationaryMethod::Eigenvector);
        assert_eq!(r.iterations, 1000);
        assert_relative_eq!(r.distribution[0], 0.25, epsilon = 1e-9);
        assert_relative_eq!(r.distribution[1], 0.5, epsilon = 1e-9);
        assert_relative_eq!(r.distribution[2], 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_power_iteration_and_eigenvector_agree() {
        let t = TransitionMatrix::from_rows(&[
            vec![0.7, 0.2, 0.1],
            vec![0.3, 0.5, 0.2],
            vec![0.2, 0.3, 0.5],
        ])
        .unwrap();
        let power = stationary_distribution(&t, &StationaryConfig::default()).unwrap();
        let starved = stationary_distribution(
            &t,
            &StationaryConfig {
                tolerance: 1e-10,
                max_iterations: 1,
            },
        )
        .unwrap();
        assert!(power.converged);
        assert_eq!(starved.method, StationaryMethod::Eigenvector);
        for (a, b) in power.distribution.iter().zip(&starved.distribution) {
            assert_relative_eq!(*a, *b, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_identity_is_already_stationary() {
        let t = TransitionMatrix::identity(4).unwrap();
        let r = stationary_distribution(&t, &StationaryConfig::default()).unwrap();
        assert!(r.converged);
        assert_eq!(r.iterations, 1);
        assert!(r.distribution.iter().all(|&p| (p - 0.25).abs() < 1e-15));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_method_serialises_snake_case() {
        assert_eq!(
            serde_json::to_string(&StationaryMethod::PowerIteration).unwrap(),
            "\"power_iteration\""
        );
        assert_eq!(
            serde_json::to_string(&StationaryMethod::Eigenvector).unwrap(),
            "\"eigenvector\""
        );
    }
}
