//! Nearest-record search over dense vectors.
//!
//! An exhaustive linear scan: every record with an embedding is compared to
//! the query by cosine similarity and the maximum wins. Catalogs are small
//! enough that no approximate index is involved.

use crate::error::{SearchError, SearchResult};
use crate::index::CatalogIndex;
use crate::outcome::{MatchMethod, MatchOutcome};

/// Cosine similarity of two equal-length vectors, or `None` when either
/// has zero norm or holds a non-finite component.
///
/// Accumulates in `f64`; the result lies in `[-1, 1]`.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let x = f64::from(x);
        let y = f64::from(y);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return None;
    }
    let cosine = dot / denom;
    if !cosine.is_finite() {
        return None;
    }
    Some(cosine.clamp(-1.0, 1.0))
}

/// Resolves query vectors against one catalog snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SemanticMatcher<'a> {
    index: &'a CatalogIndex,
}

impl<'a> SemanticMatcher<'a> {
    #[must_use]
    pub fn new(index: &'a CatalogIndex) -> Self {
        Self { index }
    }

    /// The record most similar to `query`.
    ///
    /// Records without an embedding, and zero-norm or non-finite vectors on
    /// either side, are skipped. Equal maxima keep the first record in catalog order.
    /// Returns an unmatched outcome when nothing could be compared, and
    /// [`SearchError::DimensionMismatch`] when a stored embedding has a
    /// different length than the query.
    pub fn resolve_vector(&self, query: &[f32]) -> SearchResult<MatchOutcome<'a>> {
        let index: &'a CatalogIndex = self.index;
        let mut best: Option<(usize, f64)> = None;

        for (position, entry) in index.records().iter().enumerate() {
            let Some(embedding) = entry.record.embedding.as_deref() else {
                continue;
            };
            if embedding.is_empty() {
                continue;
            }
            if embedding.len() != query.len() {
                return Err(SearchError::DimensionMismatch {
                    query: query.len(),
                    record: embedding.len(),
                    record_id: entry.record.id.to_string(),
                });
            }

            let Some(score) = cosine_similarity(query, embedding) else {
                continue;
            };
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((position, score));
            }
        }

        Ok(match best {
            Some((position, score)) => {
                let record = &index.records()[position].record;
                log::debug!("Closest record {:?} (cosine {:.4})", record.title, score);
                MatchOutcome::matched(record, MatchMethod::Semantic, score)
            }
            None => MatchOutcome::unmatched(Vec::new()),
        })
    }
}
