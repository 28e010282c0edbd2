//! Absorbing / transient / recurrent state classification.
//!
//! A state is absorbing when its self-transition is numerically 1,
//! transient when it is not absorbing but some absorbing state is reachable
//! from it, and recurrent otherwise. When both absorbing and transient states
//! exist the fundamental matrix `N = (I - Q)^-1` over the transient block
//! gives expected steps to absorption (row sums of `N`) and absorption
//! probabilities `B = N R`.

use std::collections::VecDeque;

use nalgebra::DMatrix;

use crate::math::linalg;
use crate::types::{dmatrix_to_rows, MarkovResult, TransitionMatrix};

/// An absorbing state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbsorbingState {
    /// Matrix index.
    pub index: usize,
    /// Label.
    pub state: String,
    /// Self-transition probability.
    pub self_probability: f64,
}

/// A transient state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransientState {
    /// Matrix index.
    pub index: usize,
    /// Label.
    pub state: String,
    /// Expected steps before absorption; `None` when `I - Q` is singular.
    pub mean_absorption_time: Option<f64>,
}

/// A recurrent (non-absorbing, never absorbed) state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecurrentState {
    /// Matrix index.
    pub index: usize,
    /// Label.
    pub state: String,
}

/// Partition of the state set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateClassification {
    /// Absorbing states.
    pub absorbing: Vec<AbsorbingState>,
    /// Transient states.
    pub transient: Vec<TransientState>,
    /// Recurrent states.
    pub recurrent: Vec<RecurrentState>,
    /// `N = (I - Q)^-1`, rows/columns in `transient` order.
    pub fundamental_matrix: Option<Vec<Vec<f64>>>,
    /// `B = N R`: rows in `transient` order, columns in `absorbing` order.
    pub absorption_probabilities: Option<Vec<Vec<f64>>>,
}

impl StateClassification {
    /// Total number of classified states.
    pub fn len(&self) -> usize {
        self.absorbing.len() + self.transient.len() + self.recurrent.len()
    }

    /// True when nothing was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify every state of `matrix`.
///
/// A singular `I - Q` leaves `mean_absorption_time` as `None` without failing.
///
/// # Examples
/// ```
/// use markov_core::analysis::classify_states;
/// use markov_core::types::TransitionMatrix;
///
/// let t = TransitionMatrix::from_rows(&[vec![0.9, 0.1], vec![0.0, 1.0]]).unwrap();
/// let c = classify_states(&t, &["A".to_string(), "B".to_string()]).unwrap();
/// assert_eq!(c.absorbing[0].state, "B");
/// let time = c.transient[0].mean_absorption_time.unwrap();
/// assert!((time - 10.0).abs() < 1e-9);
/// ```
pub fn classify_states(
    matrix: &TransitionMatrix,
    states: &[String],
) -> MarkovResult<StateClassification> {
    matrix.check_labels(states)?;
    let n = matrix.dim();
    let absorbing_idx = matrix.absorbing_indices();

    let absorbing: Vec<AbsorbingState> = absorbing_idx
        .iter()
        .map(|&i| AbsorbingState {
            index: i,
            state: states[i].clone(),
            self_probability: matrix.get(i, i),
        })
        .collect();

    let mut transient_idx = Vec::new();
    let mut recurrent = Vec::new();
    for i in (0..n).filter(|i| !absorbing_idx.contains(i)) {
        if reaches_any(matrix, i, &absorbing_idx) {
            transient_idx.push(i);
        } else {
            recurrent.push(RecurrentState {
                index: i,
                state: states[i].clone(),
            });
        }
    }

    let fundamental = if !absorbing_idx.is_empty() && !transient_idx.is_empty() {
        match fundamental_matrix(matrix, &transient_idx) {
            Ok(n_mat) => Some(n_mat),
            Err(err) => {
                tracing::debug!(error = %err, "absorption times omitted");
                None
            }
        }
    } else {
        None
    };

    let times: Option<Vec<f64>> = fundamental
        .as_ref()
        .map(|n_mat| n_mat.row_iter().map(|r| r.sum()).collect());
    let transient = transient_idx
        .iter()
        .enumerate()
        .map(|(k, &i)| TransientState {
            index: i,
            state: states[i].clone(),
            mean_absorption_time: times.as_ref().map(|t| t[k]),
        })
        .collect();

    let absorption_probabilities = fundamental.as_ref().map(|n_mat| {
        let r = DMatrix::from_fn(transient_idx.len(), absorbing_idx.len(), |a, b| {
            matrix.get(transient_idx[a], absorbing_idx[b])
        });
        dmatrix_to_rows(&(n_mat * r))
    });

    Ok(StateClassification {
        absorbing,
        transient,
        recurrent,
        fundamental_matrix: fundamental.as_ref().map(dmatrix_to_rows),
        absorption_probabilities,
    })
}

/// `(I - Q)^-1` over the given transient indices.
pub fn fundamental_matrix(
    matrix: &TransitionMatrix,
    transient: &[usize],
) -> MarkovResult<DMatrix<f64>> {
    let m = transient.len();
    let i_minus_q = DMatrix::from_fn(m, m, |a, b| {
        let q = matrix.get(transient[a], transient[b]);
        if a == b {
            1.0 - q
        } else {
            -q
        }
    });
    linalg::inverse(&i_minus_q, "I - Q")
}

/// Breadth-first search from `start` over positive-probability edges.
fn reaches_any(matrix: &TransitionMatrix, start: usize, targets: &[usize]) -> bool {
    if targets.is_empty() {
        return false;
    }
    let n = matrix.dim();
    let mut visited = vec![false; n];
    let mut queue = VecDeque::from([start]);
    visited[start] = true;
    while let Some(current) = queue.pop_front() {
        if targets.contains(&current) {
            return true;
        }
        for next in 0..n {
            if !visited[next] && matrix.has_edge(current, next) {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }
    false
}
