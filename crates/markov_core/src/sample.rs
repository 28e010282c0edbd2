//! Reference three-state credit portfolio.
//!
//! Monthly transitions between performing ("Sano"), delinquent ("Moroso") and
//! charged-off ("Incobrable") accounts, with matching EAD and LGD inputs.

use crate::estimation::Observation;
use crate::risk::LossParameters;
use crate::types::{MarkovResult, TransitionMatrix};

/// Performing state label.
pub const PERFORMING: &str = "Sano";
/// Delinquent state label.
pub const DELINQUENT: &str = "Moroso";
/// Charged-off state label.
pub const CHARGED_OFF: &str = "Incobrable";

/// 1 200 observed transitions.
pub fn sample_observations() -> Vec<Observation> {
    [
        (PERFORMING, PERFORMING, 900),
        (PERFORMING, DELINQUENT, 80),
        (PERFORMING, CHARGED_OFF, 20),
        (DELINQUENT, DELINQUENT, 70),
        (DELINQUENT, CHARGED_OFF, 20),
        (DELINQUENT, PERFORMING, 10),
        (CHARGED_OFF, CHARGED_OFF, 100),
    ]
    .into_iter()
    .flat_map(|(from, to, count)| Observation::repeated(from, to, count))
    .collect()
}

/// States in performing, delinquent, charged-off order.
pub fn sample_states() -> Vec<String> {
    vec![
        PERFORMING.to_string(),
        DELINQUENT.to_string(),
        CHARGED_OFF.to_string(),
    ]
}

/// Matrix implied by `sample_observations`, in `sample_states` order.
pub fn sample_matrix() -> MarkovResult<TransitionMatrix> {
    TransitionMatrix::from_rows(&[
        vec![0.90, 0.08, 0.02],
        vec![0.10, 0.70, 0.20],
        vec![0.00, 0.00, 1.00],
    ])
}

/// Exposure and severity per state.
pub fn sample_loss_parameters() -> LossParameters {
    LossParameters::default()
        .with_state(PERFORMING, 1000.0, 0.0)
        .with_state(DELINQUENT, 5000.0, 0.3)
        .with_state(CHARGED_OFF, 0.0, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::estimate_transition_matrix;
    use approx::assert_relative_eq;

    #[test]
    fn test_observations_reproduce_matrix() {
        let estimate = estimate_transition_matrix(&sample_observations()).unwrap();
        // Estimator orders states lexicographically: Incobrable, Moroso, Sano.
        assert_eq!(estimate.states, vec![CHARGED_OFF, DELINQUENT, PERFORMING]);
        let reference = sample_matrix().unwrap();
        let order = [2, 1, 0];
        for (i, &ri) in order.iter().enumerate() {
            for (j, &rj) in order.iter().enumerate() {
                assert_relative_eq!(
                    estimate.transition_matrix.get(i, j),
                    reference.get(ri, rj),
                    epsilon = 1e-12
                );
            }
        }
        assert_eq!(estimate.statistics.total_transitions, 1200);
    }
}
