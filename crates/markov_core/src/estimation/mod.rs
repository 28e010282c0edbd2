//! Transition matrix estimation from observed state pairs.

mod estimator;
mod observation;

pub use estimator::{
    estimate_from_records, estimate_matrix, estimate_transition_matrix, EstimationReport,
    MatrixEstimate, TransitionStatistics,
};
pub use observation::{parse_records, Observation};
