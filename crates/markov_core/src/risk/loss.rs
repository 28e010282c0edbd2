//! Expected loss from a transition matrix.
//!
//! For each state, PD is the one-step transition probability into the chosen
//! default state and `EL = EAD * PD * LGD`. Missing EAD or LGD entries count
//! as zero.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{MarkovError, MarkovResult, StateRole, StateRoles, TransitionMatrix};

/// Default-state labels recognised by exact match, in priority order.
pub const DEFAULT_STATE_PRIORITY: &[&str] = &["Incobrable", "Default", "Perdida"];

/// Exposure and severity inputs keyed by state label.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LossParameters {
    /// Exposure at default.
    pub ead: BTreeMap<String, f64>,
    /// Loss given default (fraction).
    pub lgd: BTreeMap<String, f64>,
}

impl LossParameters {
    /// Builder-style entry for one state.
    pub fn with_state(mut self, state: impl Into<String>, ead: f64, lgd: f64) -> Self {
        let state = state.into();
        self.ead.insert(state.clone(), ead);
        self.lgd.insert(state, lgd);
        self
    }
}

/// Loss breakdown for one state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateLoss {
    /// Exposure at default.
    #[cfg_attr(feature = "serde", serde(rename = "EAD"))]
    pub ead: f64,
    /// Probability of default.
    #[cfg_attr(feature = "serde", serde(rename = "PD"))]
    pub pd: f64,
    /// Loss given default.
    #[cfg_attr(feature = "serde", serde(rename = "LGD"))]
    pub lgd: f64,
    /// Expected loss.
    #[cfg_attr(feature = "serde", serde(rename = "EL"))]
    pub el: f64,
}

/// Expected loss for every state and in total.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LossReport {
    /// Per-state breakdown.
    pub per_state: BTreeMap<String, StateLoss>,
    /// Sum of per-state expected losses.
    pub total: f64,
    /// State whose column supplied PD.
    pub default_state: String,
    /// EAD/LGD labels that matched no state and were ignored.
    pub ignored_labels: Vec<String>,
}

/// Index of the default state.
///
/// Resolution order: the first state with an explicit `Default` role, then
/// the first label of `DEFAULT_STATE_PRIORITY` present in `states`, then the
/// last state.
pub fn default_state_index(states: &[String], roles: Option<&StateRoles>) -> Option<usize> {
    if states.is_empty() {
        return None;
    }
    roles
        .and_then(|r| r.first_with_role(states, StateRole::Default))
        .or_else(|| {
            DEFAULT_STATE_PRIORITY
                .iter()
                .find_map(|label| states.iter().position(|s| s == label))
        })
        .or(Some(states.len() - 1))
}

/// Expected loss of every state of `matrix`.
///
/// # Errors
/// `DimensionMismatch` when `states` does not label every row, `InvalidInput`
/// for duplicate labels or non-finite EAD/LGD values.
///
/// # Examples
/// ```
/// use markov_core::risk::{expected_loss, LossParameters};
/// use markov_core::types::TransitionMatrix;
///
/// let t = TransitionMatrix::from_rows(&[
///     vec![0.9, 0.08, 0.02],
///     vec![0.1, 0.7, 0.2],
///     vec![0.0, 0.0, 1.0],
/// ]).unwrap();
/// let states: Vec<String> = ["Sano", "Moroso", "Incobrable"].iter().map(|s| s.to_string()).collect();
/// let params = LossParameters::default().with_state("Sano", 1000.0, 0.5);
/// let report = expected_loss(&t, &states, &params, None).unwrap();
/// assert_eq!(report.default_state, "Incobrable");
/// assert!((report.per_state["Sano"].el - 10.0).abs() < 1e-12);
/// ```
pub fn expected_loss(
    matrix: &TransitionMatrix,
    states: &[String],
    params: &LossParameters,
    roles: Option<&StateRoles>,
) -> MarkovResult<LossReport> {
    matrix.check_labels(states)?;
    let unique: BTreeSet<&String> = states.iter().collect();
    if unique.len() != states.len() {
        return Err(MarkovError::InvalidInput(
            "state labels must be unique".to_string(),
        ));
    }
    if let Some((label, value)) = params
        .ead
        .iter()
        .chain(params.lgd.iter())
        .find(|(_, v)| !v.is_finite())
    {
        return Err(MarkovError::InvalidInput(format!(
            "loss parameter for {} is not finite: {}",
            label, value
        )));
    }

    let d = default_state_index(states, roles)
        .ok_or_else(|| MarkovError::InvalidInput("no states supplied".to_string()))?;

    let per_state: BTreeMap<String, StateLoss> = states
        .iter()
        .enumerate()
        .map(|(i, state)| {
            let ead = params.ead.get(state).copied().unwrap_or(0.0);
            let lgd = params.lgd.get(state).copied().unwrap_or(0.0);
            let pd = matrix.get(i, d);
            (
                state.clone(),
                StateLoss {
                    ead,
                    pd,
                    lgd,
                    el: ead * pd * lgd,
                },
            )
        })
        .collect();

    let ignored: BTreeSet<String> = params
        .ead
        .keys()
        .chain(params.lgd.keys())
        .filter(|k| !unique.contains(k))
        .cloned()
        .collect();
    for label in &ignored {
        let err = MarkovError::Configuration(format!("unknown state {} treated as zero", label));
        tracing::warn!(error = %err, "loss parameter ignored");
    }

    Ok(LossReport {
        total: per_state.values().map(|l| l.el).sum(),
        per_state,
        default_state: states[d].clone(),
        ignored_labels: ignored.into_iter().collect(),
    })
}
