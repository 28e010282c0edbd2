//! # markov_core: Discrete-Time Markov Chain Engine for Credit Risk
//!
//! Estimates and analyses transition matrices built from observed
//! state-to-state moves (e.g. performing → delinquent → charged-off):
//!
//! - Matrix estimation from observation pairs (`estimation`)
//! - Spectral and linear-algebra properties (`math::spectral`)
//! - Stochasticity, irreducibility, periodicity, ergodicity (`analysis`)
//! - Absorbing / transient / recurrent classification with the
//!   fundamental matrix (`analysis`)
//! - Stationary distribution via power iteration with eigenvector
//!   fallback (`analysis`)
//! - Expected loss and stress scenarios (`risk`)
//!
//! ## Architecture
//!
//! ```text
//! estimation ──► math::spectral
//!     │      ──► analysis::{properties, classification}
//!     ▼
//! analysis::stationary ◄── risk::stress
//! risk::loss (any matrix + EAD/LGD)
//! ```
//!
//! Every operation is a pure function of its inputs. There is no global
//! state; configuration (`StationaryConfig`, `StressFactors`, `StateRoles`)
//! is passed explicitly.
//!
//! ## Usage Examples
//!
//! ```rust
//! use markov_core::estimation::{estimate_matrix, Observation};
//! use markov_core::analysis::{stationary_distribution, StationaryConfig};
//!
//! let mut observations = Observation::repeated("A", "A", 9);
//! observations.push(Observation::new("A", "B"));
//! observations.push(Observation::new("B", "B"));
//!
//! let report = estimate_matrix(&observations).unwrap();
//! assert_eq!(report.states, vec!["A", "B"]);
//!
//! let classes = report.state_classification.value().unwrap();
//! let steps = classes.transient[0].mean_absorption_time.unwrap();
//! assert!((steps - 10.0).abs() < 1e-9);
//!
//! let pi = stationary_distribution(&report.transition_matrix, &StationaryConfig::default()).unwrap();
//! assert!(pi.distribution[1] > 0.999);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): `Serialize`/`Deserialize` for every report type

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analysis;
pub mod estimation;
pub mod math;
pub mod risk;
pub mod sample;
pub mod types;

pub use analysis::{
    analyze_properties, classify_states, stationary_distribution, MarkovProperties,
    StateClassification, StationaryConfig, StationaryMethod, StationaryResult,
};
pub use estimation::{estimate_from_records, estimate_matrix, EstimationReport, Observation};
pub use math::spectral::{analyze_spectrum, SpectralProperties};
pub use risk::{
    apply_stress, expected_loss, LossParameters, LossReport, StressFactors, StressReport,
};
pub use types::{MarkovError, MarkovResult, Outcome, StateRole, StateRoles, TransitionMatrix};
