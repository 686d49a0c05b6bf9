//! Free-text recommendation over stored record vectors.

use reelmatch_core::model::Record;
use reelmatch_core::CatalogProvider;
use reelmatch_search::{CatalogIndex, SemanticMatcher};
use serde::Serialize;

use crate::embedding::EmbeddingProvider;
use crate::error::{ResolveError, ResolveResult};

/// The record closest to a prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub record: Record,
    /// Cosine similarity in `[-1, 1]`.
    pub similarity: f64,
}

/// Embed `prompt` and return the most similar record.
///
/// A blank prompt and an empty catalog are errors; a catalog in which no
/// record has a usable vector yields `None`. The catalog is read before the
/// provider is called.
pub async fn recommend(
    catalog: &dyn CatalogProvider,
    provider: &dyn EmbeddingProvider,
    prompt: &str,
) -> ResolveResult<Option<Recommendation>> {
    let index = CatalogIndex::from_provider(catalog)?;
    recommend_from_index(&index, provider, prompt).await
}

/// [`recommend`] against an index the caller already built.
pub async fn recommend_from_index(
    index: &CatalogIndex,
    provider: &dyn EmbeddingProvider,
    prompt: &str,
) -> ResolveResult<Option<Recommendation>> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ResolveError::EmptyPrompt);
    }
    if index.is_empty() {
        return Err(ResolveError::EmptyCatalog);
    }

    let query = provider.embed(prompt).await?;
    let outcome = SemanticMatcher::new(index).resolve_vector(&query)?;

    Ok(outcome.matched.map(|record| {
        log::info!("Recommended {:?} (similarity {:.4})", record.title, outcome.score);
        Recommendation {
            record: record.clone(),
            similarity: outcome.score,
        }
    }))
}
