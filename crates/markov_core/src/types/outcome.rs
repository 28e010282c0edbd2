//! Per-analysis result marker.
//!
//! Analyses bundled into one report are fault-isolated: each slot holds
//! either its value or the message of the error that prevented it. With
//! the `serde` feature a failed slot serialises as `{"error": "..."}`.

use super::error::{MarkovError, MarkovResult};

/// Value of one fault-isolated computation, or the reason it is missing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Outcome<T> {
    /// The computation failed; carries the error message.
    Failed {
        /// Human-readable failure description.
        error: String,
    },
    /// The computation succeeded.
    Value(T),
}

impl<T> Outcome<T> {
    /// Run `f`, recording a failure under `label` instead of propagating it.
    pub fn capture(label: &str, f: impl FnOnce() -> MarkovResult<T>) -> Self {
        match f() {
            Ok(value) => Outcome::Value(value),
            Err(err) => {
                tracing::warn!(analysis = label, error = %err, "analysis failed");
                Outcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    /// Borrow the value if the computation succeeded.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Failed { .. } => None,
        }
    }

    /// The failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Failed { error } => Some(error),
        }
    }

    /// True when a value is present.
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    /// Consume into an `Option`, dropping the failure message.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Failed { .. } => None,
        }
    }
}

impl<T> From<MarkovResult<T>> for Outcome<T> {
    fn from(result: MarkovResult<T>) -> Self {
        match result {
            Ok(v) => Outcome::Value(v),
            Err(e) => Outcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

impl<T> From<MarkovError> for Outcome<T> {
    fn from(err: MarkovError) -> Self {
        Outcome::Failed {
            error: err.to_string(),
        }
    }
}
