//! State labels and credit roles.
//!
//! - `StateSpace`: the sorted, de-duplicated label set that fixes matrix index order
//! - `StateRole` / `StateRoles`: which states represent delinquency and default
//!
//! Roles are normally supplied by the caller. `StateRoles::infer` guesses them
//! from label text ("moroso", "incobrable", ...) for callers that only have the
//! legacy naming convention; it is a narrow substring heuristic, not a classifier.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Ordered set of state labels with a label -> index map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSpace {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl StateSpace {
    /// Build from any collection of labels; duplicates collapse and the
    /// result is sorted lexicographically.
    ///
    /// # Examples
    /// ```
    /// use markov_core::types::StateSpace;
    ///
    /// let space = StateSpace::from_labels(["Moroso", "Sano", "Incobrable", "Sano"]);
    /// assert_eq!(space.labels(), &["Incobrable", "Moroso", "Sano"]);
    /// assert_eq!(space.index_of("Sano"), Some(2));
    /// ```
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted: BTreeSet<String> = labels
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        let labels: Vec<String> = sorted.into_iter().collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self { labels, index }
    }

    /// Labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of `label`, if present.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when there are no states.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Consume into the label vector.
    pub fn into_labels(self) -> Vec<String> {
        self.labels
    }
}

/// Credit meaning of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StateRole {
    /// Performing state.
    #[default]
    Normal,
    /// Past-due / delinquent state.
    Delinquent,
    /// Default / charged-off state.
    Default,
}

/// Label fragments (lower-case) that mark a delinquency state.
pub const DELINQUENCY_KEYWORDS: &[&str] = &["moroso", "delinquent"];

/// Label fragments (lower-case) that mark a default state.
pub const DEFAULT_KEYWORDS: &[&str] = &["incobrable", "default"];

impl StateRole {
    /// Guess the role of a single label by case-insensitive substring match.
    /// Default keywords win over delinquency keywords.
    pub fn infer(label: &str) -> Self {
        let lower = label.to_lowercase();
        if DEFAULT_KEYWORDS.iter().any(|k| lower.contains(k)) {
            StateRole::Default
        } else if DELINQUENCY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            StateRole::Delinquent
        } else {
            StateRole::Normal
        }
    }
}

/// Mapping from state label to `StateRole`; unmapped labels are `Normal`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StateRoles {
    roles: BTreeMap<String, StateRole>,
}

impl StateRoles {
    /// Empty mapping (every state `Normal`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style role assignment.
    pub fn with_role(mut self, label: impl Into<String>, role: StateRole) -> Self {
        self.roles.insert(label.into(), role);
        self
    }

    /// Infer roles for every label from its text.
    ///
    /// # Examples
    /// ```
    /// use markov_core::types::{StateRole, StateRoles};
    ///
    /// let states = vec!["Incobrable".to_string(), "Moroso".to_string(), "Sano".to_string()];
    /// let roles = StateRoles::infer(&states);
    /// assert_eq!(roles.role_of("Moroso"), StateRole::Delinquent);
    /// assert_eq!(roles.first_with_role(&states, StateRole::Default), Some(0));
    /// ```
    pub fn infer(states: &[String]) -> Self {
        let roles = states
            .iter()
            .map(|s| (s.clone(), StateRole::infer(s)))
            .filter(|(_, role)| *role != StateRole::Normal)
            .collect();
        Self { roles }
    }

    /// Role of `label`.
    pub fn role_of(&self, label: &str) -> StateRole {
        self.roles.get(label).copied().unwrap_or_default()
    }

    /// Index of the first state in `states` carrying `role`.
    pub fn first_with_role(&self, states: &[String], role: StateRole) -> Option<usize> {
        states.iter().position(|s| self.role_of(s) == role)
    }

    /// Labels mapped here that do not appear in `states`.
    pub fn unknown_labels<'a>(&'a self, states: &[String]) -> Vec<&'a str> {
        self.roles
            .keys()
            .filter(|k| !states.iter().any(|s| s == *k))
            .map(String::as_str)
            .collect()
    }

    /// True when no label has been assigned a role.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_state_space_sorted_unique() {
        let space = StateSpace::from_labels(["B", "A", "C", "A"]);
        assert_eq!(space.labels(), &["A", "B", "C"]);
        assert_eq!(space.len(), 3);
        assert_eq!(space.index_of("C"), Some(2));
        assert_eq!(space.index_of("Z"), None);
    }

    #[test]
    fn test_role_inference_case_insensitive() {
        assert_eq!(StateRole::infer("MOROSO_30"), StateRole::Delinquent);
        assert_eq!(StateRole::infer("Incobrable"), StateRole::Default);
        assert_eq!(StateRole::infer("default"), StateRole::Default);
        assert_eq!(StateRole::infer("Sano"), StateRole::Normal);
    }

    #[test]
    fn test_default_keyword_takes_precedence() {
        assert_eq!(StateRole::infer("Moroso-Default"), StateRole::Default);
    }

    #[test]
    fn test_first_with_role_is_first_match() {
        let states = labels(&["Moroso30", "Moroso60", "Sano"]);
        let roles = StateRoles::infer(&states);
        assert_eq!(roles.first_with_role(&states, StateRole::Delinquent), Some(0));
        assert_eq!(roles.first_with_role(&states, StateRole::Default), None);
    }

    #[test]
    fn test_explicit_roles() {
        let states = labels(&["Current", "Late", "WrittenOff"]);
        let roles = StateRoles::new()
            .with_role("Late", StateRole::Delinquent)
            .with_role("WrittenOff", StateRole::Default)
            .with_role("Ghost", StateRole::Default);
        assert_eq!(roles.first_with_role(&states, StateRole::Delinquent), Some(1));
        assert_eq!(roles.first_with_role(&states, StateRole::Default), Some(2));
        assert_eq!(roles.role_of("Current"), StateRole::Normal);
        assert_eq!(roles.unknown_labels(&states), vec!["Ghost"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_roles_serde_map() {
        let roles: StateRoles =
            serde_json::from_str(r#"{"Late":"delinquent","Gone":"default"}"#).unwrap();
        assert_eq!(roles.role_of("Late"), StateRole::Delinquent);
        assert_eq!(roles.role_of("Gone"), StateRole::Default);
    }
}
