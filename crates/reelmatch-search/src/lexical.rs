//! Label resolution by string similarity.
//!
//! A label is first checked against the generic-placeholder filter, then
//! reduced to its comparison key and run through a strict cascade. The
//! first stage that succeeds wins; later stages never run:
//!
//! 1. exact key lookup
//! 2. substring containment, first record in catalog order
//! 3. fuzzy ratio over a shortlist of close keys
//! 4. token-overlap (Jaccard) against cached title tokens
//!
//! When all four fail the outcome carries up to
//! [`Thresholds::suggestion_count`] near misses instead.

use std::collections::BTreeSet;

use crate::generic::GenericLabelFilter;
use crate::index::{CatalogIndex, IndexedRecord};
use crate::normalize::{label_tokens, normalize_label};
use crate::outcome::{LabelResolution, MatchMethod, MatchOutcome, Suggestion};
use crate::similarity::{get_close_matches, ratio};
use crate::thresholds::Thresholds;
use crate::vocabulary::Vocabulary;

/// Jaccard index `|a ∩ b| / |a ∪ b|`, or `0.0` when both sets are empty.
#[must_use]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Runs the lexical cascade against one catalog snapshot.
#[derive(Debug, Clone)]
pub struct LexicalMatcher<'a> {
    index: &'a CatalogIndex,
    prefixes: Vec<String>,
    generic: GenericLabelFilter,
    thresholds: Thresholds,
}

impl<'a> LexicalMatcher<'a> {
    /// A matcher with the default vocabulary and thresholds.
    #[must_use]
    pub fn new(index: &'a CatalogIndex) -> Self {
        Self::with_settings(index, &Vocabulary::default(), Thresholds::default())
    }

    #[must_use]
    pub fn with_settings(
        index: &'a CatalogIndex,
        vocabulary: &Vocabulary,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            index,
            prefixes: vocabulary.prefixes.clone(),
            generic: GenericLabelFilter::new(&vocabulary.generic_basenames),
            thresholds,
        }
    }

    /// Whether `label` is a placeholder that would be skipped.
    #[must_use]
    pub fn is_generic(&self, label: &str) -> bool {
        self.generic.is_generic(label)
    }

    /// Resolve a raw label (a file stem), skipping generic placeholders.
    #[must_use]
    pub fn resolve_label(&self, raw: &str) -> LabelResolution<'a> {
        if self.generic.is_generic(raw) {
            log::debug!("Skipping generic label {:?}", raw);
            return LabelResolution::Generic;
        }
        LabelResolution::Resolved(self.match_label(raw))
    }

    /// Run the cascade on `raw` without the generic check.
    #[must_use]
    pub fn match_label(&self, raw: &str) -> MatchOutcome<'a> {
        let key = normalize_label(raw, &self.prefixes);

        // An empty key would be "contained" in every title. This also skips
        // the exact lookup, so a record whose title normalizes to "" is
        // never matched by an empty key; revisit if such titles matter.
        if key.is_empty() {
            log::debug!("Label {:?} has no comparable characters", raw);
            return MatchOutcome::unmatched(self.suggest(&key));
        }

        let outcome = self
            .exact(&key)
            .or_else(|| self.substring(&key))
            .or_else(|| self.fuzzy(&key))
            .or_else(|| self.token_overlap(raw));

        match outcome {
            Some(outcome) => {
                if let (Some(record), Some(method)) = (outcome.matched, outcome.method) {
                    log::debug!(
                        "Label {:?} matched {:?} ({}, score {:.3})",
                        raw,
                        record.title,
                        method,
                        outcome.score
                    );
                }
                outcome
            }
            None => MatchOutcome::unmatched(self.suggest(&key)),
        }
    }

    fn exact(&self, key: &str) -> Option<MatchOutcome<'a>> {
        let index: &'a CatalogIndex = self.index;
        index
            .get(key)
            .map(|entry| MatchOutcome::matched(&entry.record, MatchMethod::Exact, 1.0))
    }

    /// First record, in catalog order, whose key contains the label key or
    /// is contained by it. Not the best such record.
    ///
    /// Records with an empty normalized title are ignored here, although
    /// "" is trivially contained in any key. Candidate for revision along
    /// with first-versus-best selection.
    fn substring(&self, key: &str) -> Option<MatchOutcome<'a>> {
        let index: &'a CatalogIndex = self.index;
        index
            .records()
            .iter()
            .find(|entry| {
                let title = entry.normalized_title.as_str();
                !title.is_empty() && (title.contains(key) || key.contains(title))
            })
            .map(|entry| MatchOutcome::matched(&entry.record, MatchMethod::Substring, 1.0))
    }

    fn fuzzy(&self, key: &str) -> Option<MatchOutcome<'a>> {
        let index: &'a CatalogIndex = self.index;
        let shortlist = get_close_matches(
            key,
            index.keys(),
            self.thresholds.shortlist_size,
            self.thresholds.shortlist_cutoff,
        );

        let mut best: Option<(&str, f64)> = None;
        for (candidate, _) in shortlist {
            let score = ratio(key, candidate);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }

        let (candidate, score) = best?;
        if score < self.thresholds.fuzzy_accept {
            log::debug!(
                "Best fuzzy candidate {:?} for {:?} scored {:.3}, below {:.2}",
                candidate,
                key,
                score,
                self.thresholds.fuzzy_accept
            );
            return None;
        }
        index
            .get(candidate)
            .map(|entry| MatchOutcome::matched(&entry.record, MatchMethod::Fuzzy, score))
    }

    fn token_overlap(&self, raw: &str) -> Option<MatchOutcome<'a>> {
        let tokens = label_tokens(raw, &self.prefixes);
        if tokens.is_empty() {
            return None;
        }

        let index: &'a CatalogIndex = self.index;
        let mut best: Option<(&'a IndexedRecord, f64)> = None;
        for entry in index.records() {
            let score = jaccard(&tokens, &entry.tokens);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((entry, score));
            }
        }

        let (entry, score) = best?;
        (score >= self.thresholds.token_overlap_accept)
            .then(|| MatchOutcome::matched(&entry.record, MatchMethod::TokenOverlap, score))
    }

    /// Near misses for an unmatched key: close keys if any pass the
    /// suggestion cut-off, otherwise the best-scoring records overall.
    fn suggest(&self, key: &str) -> Vec<Suggestion<'a>> {
        let index: &'a CatalogIndex = self.index;
        let count = self.thresholds.suggestion_count;

        let close: Vec<Suggestion<'a>> =
            get_close_matches(key, index.keys(), count, self.thresholds.suggestion_cutoff)
                .into_iter()
                .filter_map(|(candidate, score)| {
                    index.get(candidate).map(|entry| Suggestion {
                        record: &entry.record,
                        score,
                    })
                })
                .collect();
        if !close.is_empty() {
            return close;
        }

        let mut ranked: Vec<Suggestion<'a>> = index
            .records()
            .iter()
            .map(|entry| Suggestion {
                record: &entry.record,
                score: ratio(key, &entry.normalized_title),
            })
            .collect();
        // Stable: equal scores keep catalog order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(count);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelmatch_core::model::Record;

    fn index_of(titles: &[&str]) -> CatalogIndex {
        CatalogIndex::build(titles.iter().map(|t| Record::new(*t)).collect())
    }

    fn resolve<'a>(index: &'a CatalogIndex, label: &str) -> MatchOutcome<'a> {
        LexicalMatcher::new(index)
            .resolve_label(label)
            .into_outcome()
            .unwrap()
    }

    #[test]
    fn test_exact_match_after_suffix_strip() {
        let index = index_of(&["The Matrix", "Matrix Reloaded"]);
        let outcome = resolve(&index, "the_matrix_2");
        assert_eq!(outcome.matched.unwrap().title, "The Matrix");
        assert_eq!(outcome.method, Some(MatchMethod::Exact));
        assert!((outcome.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_match_with_prefix_and_diacritics() {
        let index = index_of(&["Amélie", "Heat"]);
        let outcome = resolve(&index, "poster_amelie(1)");
        assert_eq!(outcome.matched.unwrap().title, "Amélie");
        assert_eq!(outcome.method, Some(MatchMethod::Exact));
    }

    #[test]
    fn test_substring_first_in_catalog_order_wins() {
        let index = index_of(&["Alien Resurrection", "Aliens", "Alien"]);
        // "alien" is exact for the third record, so use a shorter label.
        let outcome = resolve(&index, "alie");
        assert_eq!(outcome.matched.unwrap().title, "Alien Resurrection");
        assert_eq!(outcome.method, Some(MatchMethod::Substring));
    }

    #[test]
    fn test_substring_ignores_empty_titles() {
        let index = index_of(&["???", "Heat Wave"]);
        let outcome = resolve(&index, "heat");
        assert_eq!(outcome.matched.unwrap().title, "Heat Wave");
        assert_eq!(outcome.method, Some(MatchMethod::Substring));
    }

    #[test]
    fn test_substring_label_containing_title() {
        let index = index_of(&["Heat"]);
        let outcome = resolve(&index, "heat_directors_cut");
        assert_eq!(outcome.method, Some(MatchMethod::Substring));
    }

    #[test]
    fn test_fuzzy_match_on_typo() {
        let index = index_of(&["Inception"]);
        let outcome = resolve(&index, "Inceptoin");
        assert_eq!(outcome.matched.unwrap().title, "Inception");
        assert_eq!(outcome.method, Some(MatchMethod::Fuzzy));
        assert!(outcome.score >= 0.76 && outcome.score <= 1.0);
    }

    #[test]
    fn test_fuzzy_rejects_below_acceptance() {
        let index = index_of(&["Inception"]);
        let strict = Thresholds {
            fuzzy_accept: 0.95,
            ..Thresholds::default()
        };
        let matcher = LexicalMatcher::with_settings(&index, &Vocabulary::default(), strict);
        let outcome = matcher.match_label("Inceptoin");
        assert!(!outcome.is_match());
        assert_eq!(outcome.suggestions[0].record.title, "Inception");
    }

    #[test]
    fn test_token_overlap_on_reordered_title() {
        let index = index_of(&["Star Wars: A New Hope", "The Empire Strikes Back"]);
        let outcome = resolve(&index, "new hope star wars episode iv");
        assert_eq!(outcome.matched.unwrap().title, "Star Wars: A New Hope");
        assert_eq!(outcome.method, Some(MatchMethod::TokenOverlap));
        assert!((outcome.score - 4.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_title_with_extra_words_matches() {
        let index = index_of(&["Star Wars: A New Hope"]);
        let outcome = resolve(&index, "star wars episode 4 new hope");
        assert_eq!(outcome.matched.unwrap().title, "Star Wars: A New Hope");
        // ratio("starwarsepisode4newhope", "starwarsanewhope") = 20/26, just
        // above the fuzzy acceptance, so token overlap never runs.
        assert_eq!(outcome.method, Some(MatchMethod::Fuzzy));
        assert!((outcome.score - 20.0 / 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_substring_precedes_token_overlap() {
        // The label contains "godfather" (substring of record 2) and shares
        // most tokens with record 1.
        let index = index_of(&["Part II The Return", "Godfather"]);
        let outcome = resolve(&index, "the godfather part ii return");
        assert_eq!(outcome.matched.unwrap().title, "Godfather");
        assert_eq!(outcome.method, Some(MatchMethod::Substring));
    }

    #[test]
    fn test_token_overlap_ties_keep_catalog_order() {
        let index = index_of(&["Night Living Dead", "Dead Living Night"]);
        let outcome = LexicalMatcher::new(&index).match_label("living dead night one");
        assert_eq!(outcome.method, Some(MatchMethod::TokenOverlap));
        assert_eq!(outcome.matched.unwrap().title, "Night Living Dead");
        assert!((outcome.score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_no_match_returns_at_most_three_suggestions() {
        let index = index_of(&["The Matrix", "Inception", "Heat", "Ronin", "Alien"]);
        let outcome = resolve(&index, "xyzabc123");
        assert!(outcome.matched.is_none());
        assert!(outcome.method.is_none());
        assert!(!outcome.suggestions.is_empty());
        assert!(outcome.suggestions.len() <= 3);
    }

    #[test]
    fn test_fallback_suggestions_are_sorted() {
        let index = index_of(&["The Matrix", "Inception", "Heat", "Ronin", "Alien"]);
        let outcome = resolve(&index, "xyzabc123");
        let titles: Vec<&str> = outcome
            .suggestions
            .iter()
            .map(|s| s.record.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Heat", "Alien", "The Matrix"]);
        let scores: Vec<f64> = outcome.suggestions.iter().map(|s| s.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_fallback_ties_keep_catalog_order() {
        let index = index_of(&["Zzz", "Heat", "Heath", "Ronin"]);
        let outcome = resolve(&index, "qqqqq");
        let titles: Vec<&str> = outcome
            .suggestions
            .iter()
            .map(|s| s.record.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Zzz", "Heat", "Heath"]);
    }

    #[test]
    fn test_generic_label_short_circuits() {
        let index = index_of(&["Screenshot"]);
        let resolution = LexicalMatcher::new(&index).resolve_label("Screenshot_2023");
        assert_eq!(resolution, LabelResolution::Generic);
    }

    #[test]
    fn test_empty_catalog_has_no_suggestions() {
        let index = CatalogIndex::default();
        let outcome = resolve(&index, "heat");
        assert!(outcome.matched.is_none());
        assert!(outcome.suggestions.is_empty());
    }

    #[test]
    fn test_empty_key_goes_straight_to_suggestions() {
        let index = index_of(&["1917", "Heat"]);
        let outcome = resolve(&index, "1917");
        assert!(!outcome.is_match());
        assert_eq!(outcome.suggestions.len(), 2);
    }

    #[test]
    fn test_jaccard() {
        let a: BTreeSet<String> = ["a", "b"].into_iter().map(String::from).collect();
        let b: BTreeSet<String> = ["b", "c"].into_iter().map(String::from).collect();
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
        assert!(jaccard(&BTreeSet::new(), &BTreeSet::new()).abs() < f64::EPSILON);
    }
}
