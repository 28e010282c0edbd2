//! Observed state transitions.

use crate::types::{MarkovError, MarkovResult};

/// One observed move from `origin` to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    /// State at the start of the period.
    pub origin: String,
    /// State at the end of the period.
    pub destination: String,
}

impl Observation {
    /// Create an observation.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// `count` copies of the same transition.
    pub fn repeated(
        origin: impl Into<String>,
        destination: impl Into<String>,
        count: usize,
    ) -> Vec<Self> {
        vec![Self::new(origin, destination); count]
    }
}

impl<S: AsRef<str>> TryFrom<&[S]> for Observation {
    type Error = MarkovError;

    fn try_from(pair: &[S]) -> Result<Self, Self::Error> {
        match pair {
            [origin, destination] => Ok(Self::new(origin.as_ref(), destination.as_ref())),
            _ => Err(MarkovError::InvalidInput(format!(
                "observations must be [origin, destination] pairs, got {} items",
                pair.len()
            ))),
        }
    }
}

/// Convert raw `[origin, destination]` records into observations.
///
/// # Errors
/// `InvalidInput` when `records` is empty or any record is not a pair.
///
/// # Examples
/// ```
/// use markov_core::estimation::parse_records;
///
/// let obs = parse_records(&[vec!["A", "B"], vec!["B", "B"]]).unwrap();
/// assert_eq!(obs.len(), 2);
/// assert!(parse_records(&[vec!["A"]]).is_err());
/// assert!(parse_records::<&str>(&[]).is_err());
/// ```
pub fn parse_records<S: AsRef<str>>(records: &[Vec<S>]) -> MarkovResult<Vec<Observation>> {
    if records.is_empty() {
        return Err(MarkovError::InvalidInput(
            "at least one observation is required".to_string(),
        ));
    }
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            Observation::try_from(record.as_slice()).map_err(|_| {
                MarkovError::InvalidInput(format!(
                    "observation {} must be an [origin, destination] pair, got {} items",
                    i,
                    record.len()
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_pair() {
        let obs = Observation::try_from(["Sano", "Moroso"].as_slice()).unwrap();
        assert_eq!(obs, Observation::new("Sano", "Moroso"));
    }

    #[test]
    fn test_try_from_wrong_arity() {
        assert!(Observation::try_from(["A", "B", "C"].as_slice()).is_err());
        assert!(Observation::try_from(<[&str; 0]>::default().as_slice()).is_err());
    }

    #[test]
    fn test_parse_records_reports_offending_index() {
        let err = parse_records(&[vec!["A", "B"], vec!["A", "B", "C"]]).unwrap_err();
        assert!(err.to_string().contains("observation 1"));
    }

    #[test]
    fn test_repeated() {
        let obs = Observation::repeated("A", "A", 3);
        assert_eq!(obs.len(), 3);
        assert!(obs.iter().all(|o| o.origin == "A" && o.destination == "A"));
    }
}
