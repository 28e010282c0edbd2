//! Empirical transition matrix estimation.
//!
//! Counts observed transitions into an `n x n` table over the sorted state
//! set, then row-normalises. A state that never appears as an origin gets an
//! absorbing self-loop so the estimate stays row-stochastic.

use std::collections::BTreeMap;

use nalgebra::DMatrix;

use super::observation::{parse_records, Observation};
use crate::analysis::{analyze_properties, classify_states, MarkovProperties, StateClassification};
use crate::math::spectral::{analyze_spectrum, SpectralProperties};
use crate::types::{MarkovError, MarkovResult, Outcome, StateSpace, TransitionMatrix};

/// Observation counts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionStatistics {
    /// Number of observations.
    pub total_transitions: usize,
    /// Observations leaving each state (row totals of the count matrix).
    pub count_per_state: BTreeMap<String, u64>,
}

/// Estimated matrix without downstream analytics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixEstimate {
    /// Sorted state labels.
    pub states: Vec<String>,
    /// Row-normalised transition matrix.
    pub transition_matrix: TransitionMatrix,
    /// Raw counts, same shape.
    pub count_matrix: Vec<Vec<u64>>,
    /// Summary statistics.
    pub statistics: TransitionStatistics,
}

/// Estimate plus fault-isolated analytics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimationReport {
    /// Sorted state labels.
    pub states: Vec<String>,
    /// Row-normalised transition matrix.
    pub transition_matrix: TransitionMatrix,
    /// Raw counts.
    pub count_matrix: Vec<Vec<u64>>,
    /// Summary statistics.
    pub statistics: TransitionStatistics,
    /// Linear-algebra properties.
    pub spectral_properties: Outcome<SpectralProperties>,
    /// Markov structural properties.
    pub markov_properties: Outcome<MarkovProperties>,
    /// State partition.
    pub state_classification: Outcome<StateClassification>,
}

/// Count and row-normalise `observations`.
///
/// # Errors
/// `InvalidInput` when `observations` is empty.
///
/// # Examples
/// ```
/// use markov_core::estimation::{estimate_transition_matrix, Observation};
///
/// let mut obs = Observation::repeated("A", "A", 3);
/// obs.push(Observation::new("A", "B"));
/// let estimate = estimate_transition_matrix(&obs).unwrap();
/// assert_eq!(estimate.states, vec!["A", "B"]);
/// assert_eq!(estimate.transition_matrix.to_rows(), vec![vec![0.75, 0.25], vec![0.0, 1.0]]);
/// ```
pub fn estimate_transition_matrix(observations: &[Observation]) -> MarkovResult<MatrixEstimate> {
    if observations.is_empty() {
        return Err(MarkovError::InvalidInput(
            "at least one observation is required".to_string(),
        ));
    }

    let space = StateSpace::from_labels(
        observations
            .iter()
            .flat_map(|o| [o.origin.as_str(), o.destination.as_str()]),
    );
    let n = space.len();

    let mut counts = vec![vec![0_u64; n]; n];
    for obs in observations {
        // Both labels were inserted into `space` above.
        let (Some(i), Some(j)) = (space.index_of(&obs.origin), space.index_of(&obs.destination))
        else {
            continue;
        };
        counts[i][j] += 1;
    }

    let row_totals: Vec<u64> = counts.iter().map(|row| row.iter().sum()).collect();
    let probabilities = DMatrix::from_fn(n, n, |i, j| {
        let total = row_totals[i];
        if total > 0 {
            counts[i][j] as f64 / total as f64
        } else if i == j {
            1.0
        } else {
            0.0
        }
    });

    let statistics = TransitionStatistics {
        total_transitions: observations.len(),
        count_per_state: space
            .labels()
            .iter()
            .zip(&row_totals)
            .map(|(label, &total)| (label.clone(), total))
            .collect(),
    };

    Ok(MatrixEstimate {
        states: space.into_labels(),
        transition_matrix: TransitionMatrix::from_dmatrix(probabilities)?,
        count_matrix: counts,
        statistics,
    })
}

/// Estimate the matrix and attach spectral, structural and classification
/// analytics. A failing analysis is recorded in its slot; only invalid input
/// fails the whole call.
pub fn estimate_matrix(observations: &[Observation]) -> MarkovResult<EstimationReport> {
    let estimate = estimate_transition_matrix(observations)?;
    let matrix = &estimate.transition_matrix;
    let states = &estimate.states;

    tracing::debug!(
        states = states.len(),
        observations = observations.len(),
        "transition matrix estimated"
    );

    let spectral_properties = Outcome::capture("spectral", || Ok(analyze_spectrum(matrix)));
    let markov_properties = Outcome::capture("markov", || analyze_properties(matrix, states));
    let state_classification = Outcome::capture("classification", || classify_states(matrix, states));

    Ok(EstimationReport {
        spectral_properties,
        markov_properties,
        state_classification,
        states: estimate.states,
        transition_matrix: estimate.transition_matrix,
        count_matrix: estimate.count_matrix,
        statistics: estimate.statistics,
    })
}

/// `estimate_matrix` over raw `[origin, destination]` records.
pub fn estimate_from_records<S: AsRef<str>>(records: &[Vec<S>]) -> MarkovResult<EstimationReport> {
    estimate_matrix(&parse_records(records)?)
}
