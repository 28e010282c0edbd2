//! Stress scenarios on transition matrices.
//!
//! Every row's entry in the delinquency column is multiplied by the
//! delinquency factor, every row's entry in the default column by the default
//! factor, and rows are renormalised to sum to 1. Rows that sum to zero are
//! left unchanged. Stationary distributions before and after the shock are
//! reported side by side.

use nalgebra::DMatrix;

use crate::analysis::{stationary_distribution, StationaryConfig, StationaryResult};
use crate::types::{MarkovError, MarkovResult, StateRole, StateRoles, TransitionMatrix};

/// Multiplicative shocks for the delinquency and default columns.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StressFactors {
    /// Factor applied to transitions into the delinquency state.
    pub delinquency: f64,
    /// Factor applied to transitions into the default state.
    pub default: f64,
}

impl Default for StressFactors {
    /// Default values:
    /// - `delinquency`: 1.2
    /// - `default`: 1.3
    fn default() -> Self {
        Self {
            delinquency: 1.2,
            default: 1.3,
        }
    }
}

impl StressFactors {
    /// Create factors.
    pub fn new(delinquency: f64, default: f64) -> Self {
        Self {
            delinquency,
            default,
        }
    }

    /// Factors of 1.0: no shock.
    pub fn neutral() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Factors must be finite and non-negative.
    pub fn validate(&self) -> MarkovResult<()> {
        for (name, f) in [("delinquency", self.delinquency), ("default", self.default)] {
            if !f.is_finite() || f < 0.0 {
                return Err(MarkovError::InvalidInput(format!(
                    "{} factor must be finite and non-negative, got {}",
                    name, f
                )));
            }
        }
        Ok(())
    }
}

/// Columns a stress scenario acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StressColumns {
    /// Delinquency column, if any.
    pub delinquency: Option<usize>,
    /// Default column, if any.
    pub default: Option<usize>,
}

impl StressColumns {
    /// First state carrying each role.
    pub fn resolve(states: &[String], roles: &StateRoles) -> Self {
        Self {
            delinquency: roles.first_with_role(states, StateRole::Delinquent),
            default: roles.first_with_role(states, StateRole::Default),
        }
    }
}

/// Factors and the states they were applied to.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedStress {
    /// Delinquency factor as requested.
    pub delinquency_factor: f64,
    /// Default factor as requested.
    pub default_factor: f64,
    /// State whose column received the delinquency factor.
    pub delinquency_state: Option<String>,
    /// State whose column received the default factor.
    pub default_state: Option<String>,
}

/// Result of a stress scenario.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StressReport {
    /// Shocked, renormalised matrix.
    pub stressed_matrix: TransitionMatrix,
    /// Stationary distribution of the input matrix.
    pub stationary_base: StationaryResult,
    /// Stationary distribution of the stressed matrix.
    pub stationary_stressed: StationaryResult,
    /// Applied factors.
    pub factors: AppliedStress,
}

/// Scale the given columns and renormalise rows.
///
/// # Examples
/// ```
/// use markov_core::risk::{stress_matrix, StressColumns, StressFactors};
/// use markov_core::types::TransitionMatrix;
///
/// let t = TransitionMatrix::from_rows(&[vec![0.9, 0.1], vec![0.0, 1.0]]).unwrap();
/// let columns = StressColumns { delinquency: None, default: Some(1) };
/// let stressed = stress_matrix(&t, columns, StressFactors::new(1.0, 2.0)).unwrap();
/// assert!((stressed.get(0, 1) - 0.2 / 1.1).abs() < 1e-12);
/// ```
pub fn stress_matrix(
    matrix: &TransitionMatrix,
    columns: StressColumns,
    factors: StressFactors,
) -> MarkovResult<TransitionMatrix> {
    factors.validate()?;
    let n = matrix.dim();
    let mut stressed: DMatrix<f64> = matrix.as_dmatrix().clone();

    for i in 0..n {
        if let Some(j) = columns.delinquency {
            stressed[(i, j)] *= factors.delinquency;
        }
        if let Some(j) = columns.default {
            stressed[(i, j)] *= factors.default;
        }
        let sum = stressed.row(i).sum();
        if sum > 0.0 {
            for j in 0..n {
                stressed[(i, j)] /= sum;
            }
        }
    }

    TransitionMatrix::from_dmatrix(stressed)
}

/// Apply a stress scenario and compare stationary distributions.
///
/// Columns come from `roles`; with `None` they are inferred from the labels
/// (see `StateRoles::infer`). A role with no matching state leaves its factor
/// unapplied.
pub fn apply_stress(
    matrix: &TransitionMatrix,
    states: &[String],
    factors: StressFactors,
    roles: Option<&StateRoles>,
    config: &StationaryConfig,
) -> MarkovResult<StressReport> {
    matrix.check_labels(states)?;
    let inferred;
    let roles = match roles {
        Some(r) => r,
        None => {
            inferred = StateRoles::infer(states);
            &inferred
        }
    };
    let columns = StressColumns::resolve(states, roles);
    tracing::debug!(
        delinquency = ?columns.delinquency,
        default = ?columns.default,
        "stress columns resolved"
    );

    let stressed_matrix = stress_matrix(matrix, columns, factors)?;
    let stationary_base = stationary_distribution(matrix, config)?;
    let stationary_stressed = stationary_distribution(&stressed_matrix, config)?;

    Ok(StressReport {
        stressed_matrix,
        stationary_base,
        stationary_stressed,
        factors: AppliedStress {
            delinquency_factor: factors.delinquency,
            default_factor: factors.default,
            delinquency_state: columns.delinquency.map(|j| states[j].clone()),
            default_state: columns.default.map(|j| states[j].clone()),
        },
    })
}
