//! End-to-end credit scenarios through the public API.

use approx::assert_relative_eq;
use markov_core::analysis::{classify_states, stationary_distribution, StationaryConfig};
use markov_core::estimation::{estimate_from_records, estimate_matrix, Observation};
use markov_core::risk::{apply_stress, expected_loss, LossParameters, StressFactors};
use markov_core::sample::{sample_loss_parameters, sample_matrix, sample_observations, sample_states};
use markov_core::types::{MarkovError, TransitionMatrix};

fn labels(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

/// Nine A->A, one A->B and one B->B: B absorbs, A leaves after ten steps on average.
#[test]
fn test_single_absorbing_state_scenario() {
    let mut observations = Observation::repeated("A", "A", 9);
    observations.push(Observation::new("A", "B"));
    observations.push(Observation::new("B", "B"));

    let report = estimate_matrix(&observations).unwrap();
    assert_eq!(report.states, vec!["A", "B"]);
    let rows = report.transition_matrix.to_rows();
    assert_relative_eq!(rows[0][0], 0.9, epsilon = 1e-15);
    assert_relative_eq!(rows[0][1], 0.1, epsilon = 1e-15);
    assert_eq!(rows[1], vec![0.0, 1.0]);

    let classes = report.state_classification.value().unwrap();
    assert_eq!(classes.absorbing.len(), 1);
    assert_eq!(classes.absorbing[0].state, "B");
    assert_eq!(classes.transient.len(), 1);
    assert_eq!(classes.transient[0].state, "A");
    assert!(classes.recurrent.is_empty());
    assert_relative_eq!(
        classes.transient[0].mean_absorption_time.unwrap(),
        10.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_expected_loss_scenario() {
    let t = sample_matrix().unwrap();
    let params = LossParameters::default().with_state("Sano", 1000.0, 0.5);
    let report = expected_loss(&t, &sample_states(), &params, None).unwrap();
    assert_eq!(report.default_state, "Incobrable");
    assert_relative_eq!(report.per_state["Sano"].pd, 0.02, epsilon = 1e-15);
    assert_relative_eq!(report.per_state["Sano"].el, 10.0, epsilon = 1e-12);
}

#[test]
fn test_sample_portfolio_losses() {
    let t = sample_matrix().unwrap();
    let report = expected_loss(&t, &sample_states(), &sample_loss_parameters(), None).unwrap();
    // Only the delinquent bucket has both exposure and severity.
    assert_relative_eq!(report.total, 5000.0 * 0.2 * 0.3, epsilon = 1e-9);
}

#[test]
fn test_delinquency_stress_scenario() {
    let t = sample_matrix().unwrap();
    let report = apply_stress(
        &t,
        &sample_states(),
        StressFactors::new(2.0, 1.0),
        None,
        &StationaryConfig::default(),
    )
    .unwrap();
    let row = &report.stressed_matrix.to_rows()[0];
    assert_relative_eq!(row[0], 0.8491, epsilon = 1e-4);
    assert_relative_eq!(row[1], 0.1509, epsilon = 1e-4);
    assert_relative_eq!(row[2], 0.0189, epsilon = 1e-4);
}

#[test]
fn test_stress_shifts_long_run_mass_toward_default() {
    // Make default non-absorbing so the chain has an interior stationary law.
    let t = TransitionMatrix::from_rows(&[
        vec![0.90, 0.08, 0.02],
        vec![0.10, 0.70, 0.20],
        vec![0.30, 0.00, 0.70],
    ])
    .unwrap();
    let report = apply_stress(
        &t,
        &sample_states(),
        StressFactors::default(),
        None,
        &StationaryConfig::default(),
    )
    .unwrap();
    let base = &report.stationary_base.distribution;
    let stressed = &report.stationary_stressed.distribution;
    assert!(stressed[2] > base[2]);
    assert_relative_eq!(stressed.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_identity_boundary() {
    let t = TransitionMatrix::identity(3).unwrap();
    let states = labels(&["A", "B", "C"]);
    let classes = classify_states(&t, &states).unwrap();
    assert_eq!(classes.absorbing.len(), 3);
    assert!(classes.transient.is_empty());
    assert!(classes.recurrent.is_empty());

    let props = markov_core::analysis::analyze_properties(&t, &states).unwrap();
    assert_eq!(props.periods, vec![1, 1, 1]);
}

#[test]
fn test_sample_portfolio_estimate_is_complete() {
    let report = estimate_matrix(&sample_observations()).unwrap();
    assert!(report.spectral_properties.is_value());
    assert!(report.markov_properties.is_value());
    assert!(report.state_classification.is_value());

    let spectral = report.spectral_properties.value().unwrap();
    let eigen = spectral.eigen.value().unwrap();
    assert_relative_eq!(eigen.eigenvalues.dominant, 1.0, epsilon = 1e-10);
    assert!(spectral.condition_number.is_value());

    let props = report.markov_properties.value().unwrap();
    assert_eq!(props.absorbing_states, vec!["Incobrable".to_string()]);
    assert!(!props.is_ergodic);
}

#[test]
fn test_chain_of_transitions_reports_true_eigen_pairs() {
    let observations = vec![
        Observation::new("A", "B"),
        Observation::new("B", "C"),
        Observation::new("C", "C"),
    ];
    let report = estimate_matrix(&observations).unwrap();
    let t = report.transition_matrix.to_rows();
    let eigen = report
        .spectral_properties
        .value()
        .unwrap()
        .eigen
        .value()
        .unwrap();

    for (k, v) in eigen.eigenvectors.vectors.iter().enumerate() {
        let lambda = eigen.eigenvalues.real[k];
        let residual: f64 = t
            .iter()
            .zip(v)
            .map(|(row, vi)| {
                let av: f64 = row.iter().zip(v).map(|(a, x)| a * x).sum();
                (av - lambda * vi).powi(2)
            })
            .sum::<f64>()
            .sqrt();
        assert!(residual < 1e-8, "pair {} has residual {}", k, residual);
    }
}

#[test]
fn test_dominant_eigenvalue_matches_stationary() {
    let t = TransitionMatrix::from_rows(&[
        vec![0.6, 0.3, 0.1],
        vec![0.2, 0.6, 0.2],
        vec![0.1, 0.2, 0.7],
    ])
    .unwrap();
    let spectral = markov_core::analyze_spectrum(&t);
    let eigen = spectral.eigen.value().unwrap();
    assert_relative_eq!(eigen.eigenvalues.dominant, 1.0, epsilon = 1e-10);

    let pi = stationary_distribution(&t, &StationaryConfig::default()).unwrap();
    assert!(pi.converged);
    assert!(pi.residual < 1e-9);
}

#[test]
fn test_malformed_input_is_hard_failure() {
    assert!(matches!(
        estimate_from_records::<&str>(&[]),
        Err(MarkovError::InvalidInput(_))
    ));
    assert!(matches!(
        estimate_from_records(&[vec!["A"]]),
        Err(MarkovError::InvalidInput(_))
    ));
}

#[cfg(feature = "serde")]
#[test]
fn test_report_serialises_with_embedded_outcomes() {
    let report = estimate_from_records(&[vec!["A", "B"], vec!["B", "B"]]).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["states"], serde_json::json!(["A", "B"]));
    assert_eq!(json["transition_matrix"], serde_json::json!([[0.0, 1.0], [0.0, 1.0]]));
    assert_eq!(json["count_matrix"], serde_json::json!([[0, 1], [0, 1]]));
    assert!(json["spectral_properties"]["trace"].is_number());
    // [[0, 1], [0, 1]] is singular: the condition number slot carries an error.
    assert!(json["spectral_properties"]["condition_number"]["error"].is_string());
    assert!(json["state_classification"]["transient"].is_array());
}
