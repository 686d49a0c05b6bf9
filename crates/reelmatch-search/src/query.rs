//! A single entry point over both matchers.

use crate::error::SearchResult;
use crate::index::CatalogIndex;
use crate::lexical::LexicalMatcher;
use crate::outcome::LabelResolution;
use crate::semantic::SemanticMatcher;
use crate::thresholds::Thresholds;
use crate::vocabulary::Vocabulary;

/// What a caller wants resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// A free-form label, typically an image file stem.
    Label(String),
    /// A dense vector from the embedding provider.
    Vector(Vec<f32>),
}

impl CatalogIndex {
    /// Resolve a query with the default vocabulary and thresholds.
    pub fn resolve(&self, query: &Query) -> SearchResult<LabelResolution<'_>> {
        self.resolve_with(query, &Vocabulary::default(), Thresholds::default())
    }

    /// Resolve a label through the lexical path or a vector through the
    /// semantic path. Vectors are never filtered as generic.
    pub fn resolve_with(
        &self,
        query: &Query,
        vocabulary: &Vocabulary,
        thresholds: Thresholds,
    ) -> SearchResult<LabelResolution<'_>> {
        match query {
            Query::Label(raw) => {
                Ok(LexicalMatcher::with_settings(self, vocabulary, thresholds).resolve_label(raw))
            }
            Query::Vector(values) => SemanticMatcher::new(self)
                .resolve_vector(values)
                .map(LabelResolution::Resolved),
        }
    }
}
