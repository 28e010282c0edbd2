//! Error types for the Markov engine.
//!
//! This module provides:
//! - `MarkovError`: every failure the engine can report
//! - `MarkovResult<T>`: result alias used across the crate

use thiserror::Error;

/// Categorised engine errors.
///
/// # Variants
/// - `InvalidInput`: Malformed or empty input (observations, matrices, labels)
/// - `DimensionMismatch`: Matrix or label list sizes disagree
/// - `Numerical`: A linear-algebra operation could not be carried out
///   (singular matrix, non-convergent decomposition, non-finite result)
/// - `Configuration`: A caller-supplied mapping references unknown states
///
/// # Examples
/// ```
/// use markov_core::types::MarkovError;
///
/// let err = MarkovError::InvalidInput("no observations supplied".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: no observations supplied");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkovError {
    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two sizes that must agree do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Size required by the other operand.
        expected: usize,
        /// Size actually supplied.
        actual: usize,
    },

    /// Numerical failure during a linear-algebra computation.
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Caller configuration refers to something the chain does not contain.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MarkovError {
    /// Short machine-readable kind, used by the request layer.
    pub fn kind(&self) -> &'static str {
        match self {
            MarkovError::InvalidInput(_) | MarkovError::DimensionMismatch { .. } => {
                "invalid_input"
            }
            MarkovError::Numerical(_) => "numerical_error",
            MarkovError::Configuration(_) => "configuration_error",
        }
    }

    /// Shorthand for a singular-matrix numerical error.
    pub fn singular(what: &str) -> Self {
        MarkovError::Numerical(format!("{} is singular", what))
    }
}

/// Result alias for engine operations.
pub type MarkovResult<T> = Result<T, MarkovError>;
