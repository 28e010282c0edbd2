//! Core value types shared by every engine component.
//!
//! This module provides:
//! - `MarkovError` / `MarkovResult` (`error`)
//! - `Outcome<T>`, the per-analysis success-or-failure slot (`outcome`)
//! - `TransitionMatrix` and the numeric tolerances (`matrix`)
//! - `StateSpace`, `StateRole`, `StateRoles` (`state`)

pub mod error;
pub mod matrix;
pub mod outcome;
pub mod state;

pub use error::{MarkovError, MarkovResult};
pub use matrix::{
    dmatrix_to_rows, TransitionMatrix, ABSORBING_TOLERANCE, EDGE_THRESHOLD, STOCHASTIC_TOLERANCE,
};
pub use outcome::Outcome;
pub use state::{StateRole, StateRoles, StateSpace, DEFAULT_KEYWORDS, DELINQUENCY_KEYWORDS};
