//! Tunable cut-offs for the lexical cascade.
//!
//! All ratios are gestalt similarity scores in `[0, 1]` (see
//! [`crate::similarity`]) except [`TOKEN_OVERLAP_ACCEPT`], which is a
//! Jaccard index over word tokens.

use serde::{Deserialize, Serialize};

/// Minimum ratio for a title to enter the fuzzy shortlist.
///
/// Deliberately looser than [`FUZZY_ACCEPT`]: the shortlist only has to
/// keep plausible candidates for the exact comparison.
pub const SHORTLIST_CUTOFF: f64 = 0.72;

/// Minimum ratio for the best shortlisted title to count as a match.
pub const FUZZY_ACCEPT: f64 = 0.76;

/// Minimum Jaccard index for a token-overlap match. Long titles with a few
/// extra or missing words typically land between 0.4 and 0.7.
pub const TOKEN_OVERLAP_ACCEPT: f64 = 0.4;

/// Minimum ratio for a title to be offered as a suggestion after a miss.
pub const SUGGESTION_CUTOFF: f64 = 0.6;

/// Maximum number of titles kept in the fuzzy shortlist.
pub const SHORTLIST_SIZE: usize = 5;

/// Maximum number of suggestions returned after a miss.
pub const SUGGESTION_COUNT: usize = 3;

/// The cascade cut-offs as one value, so a corpus can override them from
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub shortlist_cutoff: f64,
    pub fuzzy_accept: f64,
    pub token_overlap_accept: f64,
    pub suggestion_cutoff: f64,
    pub shortlist_size: usize,
    pub suggestion_count: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            shortlist_cutoff: SHORTLIST_CUTOFF,
            fuzzy_accept: FUZZY_ACCEPT,
            token_overlap_accept: TOKEN_OVERLAP_ACCEPT,
            suggestion_cutoff: SUGGESTION_CUTOFF,
            shortlist_size: SHORTLIST_SIZE,
            suggestion_count: SUGGESTION_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortlist_is_looser_than_acceptance() {
        let t = Thresholds::default();
        assert!(t.shortlist_cutoff < t.fuzzy_accept);
        assert!(t.suggestion_cutoff < t.shortlist_cutoff);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let t: Thresholds = serde_json::from_str(r#"{"fuzzy_accept": 0.9}"#).unwrap();
        assert!((t.fuzzy_accept - 0.9).abs() < f64::EPSILON);
        assert_eq!(t.shortlist_size, SHORTLIST_SIZE);
    }
}
