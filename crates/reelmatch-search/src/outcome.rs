use std::fmt;

use serde::{Deserialize, Serialize};

use reelmatch_core::model::Record;

/// Which matcher stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Substring,
    Fuzzy,
    TokenOverlap,
    Semantic,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::Substring => "substring",
            Self::Fuzzy => "fuzzy",
            Self::TokenOverlap => "token-overlap",
            Self::Semantic => "semantic",
        };
        f.write_str(name)
    }
}

/// A near-miss offered when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suggestion<'a> {
    pub record: &'a Record,
    pub score: f64,
}

/// The result of resolving one query against a catalog.
///
/// Either `matched` is set (with its `method` and `score`), or
/// `suggestions` lists near misses. Both are empty only for an empty
/// catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome<'a> {
    pub matched: Option<&'a Record>,
    pub method: Option<MatchMethod>,
    pub score: f64,
    pub suggestions: Vec<Suggestion<'a>>,
}

impl<'a> MatchOutcome<'a> {
    #[must_use]
    pub fn matched(record: &'a Record, method: MatchMethod, score: f64) -> Self {
        Self {
            matched: Some(record),
            method: Some(method),
            score,
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    pub fn unmatched(suggestions: Vec<Suggestion<'a>>) -> Self {
        Self {
            matched: None,
            method: None,
            score: 0.0,
            suggestions,
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

/// The result of the lexical path, which may refuse a label outright.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelResolution<'a> {
    /// The label is a placeholder name and was never matched.
    Generic,
    Resolved(MatchOutcome<'a>),
}

impl<'a> LabelResolution<'a> {
    /// The outcome, unless the label was skipped as generic.
    #[must_use]
    pub fn outcome(&self) -> Option<&MatchOutcome<'a>> {
        match self {
            Self::Generic => None,
            Self::Resolved(outcome) => Some(outcome),
        }
    }

    #[must_use]
    pub fn into_outcome(self) -> Option<MatchOutcome<'a>> {
        match self {
            Self::Generic => None,
            Self::Resolved(outcome) => Some(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(MatchMethod::TokenOverlap.to_string(), "token-overlap");
        assert_eq!(MatchMethod::Exact.to_string(), "exact");
    }

    #[test]
    fn test_outcome_constructors() {
        let record = Record::new("Heat");
        let hit = MatchOutcome::matched(&record, MatchMethod::Exact, 1.0);
        assert!(hit.is_match());
        assert!(hit.suggestions.is_empty());

        let miss = MatchOutcome::unmatched(vec![Suggestion {
            record: &record,
            score: 0.4,
        }]);
        assert!(!miss.is_match());
        assert!(miss.method.is_none());
    }

    #[test]
    fn test_generic_resolution_has_no_outcome() {
        assert!(LabelResolution::Generic.outcome().is_none());
    }
}
