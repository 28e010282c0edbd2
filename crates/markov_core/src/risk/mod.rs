//! Credit-risk engines built on a transition matrix.
//!
//! - `loss`: expected loss per state (`EL = EAD * PD * LGD`)
//! - `stress`: column shocks with stationary before/after comparison

mod loss;
mod stress;

pub use loss::{
    default_state_index, expected_loss, LossParameters, LossReport, StateLoss,
    DEFAULT_STATE_PRIORITY,
};
pub use stress::{
    apply_stress, stress_matrix, AppliedStress, StressColumns, StressFactors, StressReport,
};
