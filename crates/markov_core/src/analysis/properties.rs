//! Markov-chain structural properties.
//!
//! Stochasticity, irreducibility, periodicity, ergodicity and absorbing
//! states of a transition matrix.
//!
//! Periodicity is approximate: only return cycles of length 1, 2 and 3 are
//! inspected. A state whose shortest returns are longer (e.g. a pure 4-cycle)
//! reports period 0 ("no return found") and the chain is then treated as
//! aperiodic. Tests pin this boundary; it is not a general period computation.

use crate::types::{MarkovResult, TransitionMatrix, STOCHASTIC_TOLERANCE};

/// Longest return cycle inspected by the periodicity check.
pub const MAX_CYCLE_LENGTH: u32 = 3;

/// Structural properties of a chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkovProperties {
    /// Every row sums to 1 within tolerance.
    pub is_stochastic: bool,
    /// Row sums.
    pub row_sums: Vec<f64>,
    /// Column sums.
    pub column_sums: Vec<f64>,
    /// Largest `|row_sum - 1|`.
    pub stochastic_deviation: f64,
    /// Rows and columns both sum to 1.
    pub is_doubly_stochastic: bool,
    /// Every state reaches every other state.
    pub is_irreducible: bool,
    /// `communication[i][j]`: `i` and `j` reach each other.
    pub communication: Vec<Vec<bool>>,
    /// Per-state period from return cycles of length <= 3; 0 when none found.
    pub periods: Vec<u32>,
    /// Every period is 0 or 1.
    pub is_aperiodic: bool,
    /// Irreducible and aperiodic.
    pub is_ergodic: bool,
    /// Labels of absorbing states.
    pub absorbing_states: Vec<String>,
    /// At least one absorbing state exists.
    pub has_absorbing_states: bool,
}

/// Analyse the structural properties of `matrix` labelled by `states`.
///
/// # Errors
/// `DimensionMismatch` when `states` does not label every row.
///
/// # Examples
/// ```
/// use markov_core::analysis::analyze_properties;
/// use markov_core::types::TransitionMatrix;
///
/// let t = TransitionMatrix::from_rows(&[vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
/// let states = vec!["A".to_string(), "B".to_string()];
/// let p = analyze_properties(&t, &states).unwrap();
/// assert!(p.is_ergodic);
/// assert!(p.is_doubly_stochastic);
/// ```
pub fn analyze_properties(
    matrix: &TransitionMatrix,
    states: &[String],
) -> MarkovResult<MarkovProperties> {
    matrix.check_labels(states)?;
    let n = matrix.dim();

    let row_sums = matrix.row_sums();
    let column_sums = matrix.column_sums();
    let within = |sums: &[f64]| sums.iter().all(|s| (s - 1.0).abs() <= STOCHASTIC_TOLERANCE);
    let stochastic_deviation = row_sums
        .iter()
        .map(|s| (s - 1.0).abs())
        .fold(0.0, f64::max);
    let is_stochastic = within(&row_sums);
    let is_doubly_stochastic = is_stochastic && within(&column_sums);

    let reach = reachability(matrix);
    let communication: Vec<Vec<bool>> = (0..n)
        .map(|i| (0..n).map(|j| reach[i][j] && reach[j][i]).collect())
        .collect();
    let is_irreducible = communication.iter().all(|row| row.iter().all(|&c| c));

    let periods: Vec<u32> = (0..n).map(|i| state_period(matrix, i)).collect();
    let is_aperiodic = periods.iter().all(|&p| p <= 1);

    let absorbing_states: Vec<String> = matrix
        .absorbing_indices()
        .into_iter()
        .map(|i| states[i].clone())
        .collect();

    Ok(MarkovProperties {
        is_stochastic,
        row_sums,
        column_sums,
        stochastic_deviation,
        is_doubly_stochastic,
        is_irreducible,
        communication,
        periods,
        is_aperiodic,
        is_ergodic: is_irreducible && is_aperiodic,
        has_absorbing_states: !absorbing_states.is_empty(),
        absorbing_states,
    })
}

/// Transitive closure of the edge relation (Warshall). `reach[i][i]` is
/// always true.
pub fn reachability(matrix: &TransitionMatrix) -> Vec<Vec<bool>> {
    let n = matrix.dim();
    let mut reach: Vec<Vec<bool>> = (0..n)
        .map(|i| (0..n).map(|j| i == j || matrix.has_edge(i, j)).collect())
        .collect();
    for k in 0..n {
        for i in 0..n {
            if !reach[i][k] {
                continue;
            }
            for j in 0..n {
                if reach[k][j] {
                    reach[i][j] = true;
                }
            }
        }
    }
    reach
}

/// Period of state `i` from its return cycles of length 1, 2 and 3.
pub fn state_period(matrix: &TransitionMatrix, i: usize) -> u32 {
    let n = matrix.dim();
    let mut returns: Vec<u32> = Vec::new();

    if matrix.has_edge(i, i) {
        returns.push(1);
    }
    for j in (0..n).filter(|&j| j != i) {
        if matrix.has_edge(i, j) && matrix.has_edge(j, i) {
            returns.push(2);
        }
    }
    for j in (0..n).filter(|&j| j != i) {
        for k in (0..n).filter(|&k| k != i && k != j) {
            if matrix.has_edge(i, j) && matrix.has_edge(j, k) && matrix.has_edge(k, i) {
                returns.push(MAX_CYCLE_LENGTH);
            }
        }
    }

    returns.into_iter().fold(0, gcd)
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
