//! The embedding batch: give every record a vector for semantic search.
//!
//! Split in three steps so callers holding a non-`Sync` store never keep
//! it across an `.await`: pick the records, fetch their vectors, then
//! write the vectors back.

use reelmatch_core::model::{Record, RecordId};
use reelmatch_core::{CatalogProvider, RecordStore};
use serde::Serialize;

use crate::embedding::EmbeddingProvider;
use crate::error::ResolveResult;

/// A record that received a vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedRecord {
    pub record_id: RecordId,
    pub title: String,
    pub dimensions: usize,
}

/// A record whose vector could not be fetched or stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFailure {
    pub record_id: RecordId,
    pub title: String,
    pub error: String,
}

/// Summary of an embedding run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmbedReport {
    pub embedded: Vec<EmbeddedRecord>,
    /// Records left alone because they already had a vector.
    pub skipped: usize,
    pub failures: Vec<EmbedFailure>,
}

/// A fetched vector waiting to be written.
#[derive(Debug, Clone)]
pub struct ComputedEmbedding {
    pub record: Record,
    pub embedding: Vec<f32>,
}

/// The text sent to the provider for a record.
#[must_use]
pub fn embedding_text(record: &Record) -> String {
    let description = record.description.trim();
    if description.is_empty() {
        record.title.clone()
    } else {
        format!("{}: {}", record.title, description)
    }
}

/// Records needing a vector, in catalog order. With `force`, every record.
pub fn records_to_embed(
    catalog: &dyn CatalogProvider,
    force: bool,
    report: &mut EmbedReport,
) -> ResolveResult<Vec<Record>> {
    let records = catalog.list_records()?;
    let total = records.len();
    let pending: Vec<Record> = records
        .into_iter()
        .filter(|r| force || !r.has_embedding())
        .collect();
    report.skipped += total - pending.len();
    Ok(pending)
}

/// Fetch a vector for each record. Provider failures are recorded per
/// record and do not stop the run.
pub async fn compute_embeddings(
    provider: &dyn EmbeddingProvider,
    records: Vec<Record>,
    report: &mut EmbedReport,
) -> Vec<ComputedEmbedding> {
    let mut computed = Vec::with_capacity(records.len());
    for record in records {
        match provider.embed(&embedding_text(&record)).await {
            Ok(embedding) => computed.push(ComputedEmbedding { record, embedding }),
            Err(e) => {
                log::warn!("Failed to embed {:?}: {e}", record.title);
                report.failures.push(EmbedFailure {
                    record_id: record.id,
                    title: record.title,
                    error: e.to_string(),
                });
            }
        }
    }
    computed
}

/// Write fetched vectors one record at a time.
pub fn store_embeddings(
    store: &dyn RecordStore,
    computed: Vec<ComputedEmbedding>,
    report: &mut EmbedReport,
) {
    for ComputedEmbedding { record, embedding } in computed {
        match store.update_embedding(&record.id, &embedding) {
            Ok(()) => {
                log::debug!("Stored {}-d embedding for {:?}", embedding.len(), record.title);
                report.embedded.push(EmbeddedRecord {
                    record_id: record.id,
                    title: record.title,
                    dimensions: embedding.len(),
                });
            }
            Err(e) => {
                log::warn!("Failed to store embedding for {:?}: {e}", record.title);
                report.failures.push(EmbedFailure {
                    record_id: record.id,
                    title: record.title,
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Embed the catalog end to end.
pub async fn embed_catalog(
    catalog: &dyn CatalogProvider,
    store: &dyn RecordStore,
    provider: &dyn EmbeddingProvider,
    force: bool,
) -> ResolveResult<EmbedReport> {
    let mut report = EmbedReport::default();
    let pending = records_to_embed(catalog, force, &mut report)?;
    log::info!("Embedding {} records ({} skipped)", pending.len(), report.skipped);

    let computed = compute_embeddings(provider, pending, &mut report).await;
    store_embeddings(store, computed, &mut report);

    log::info!(
        "Finished embedding. Embedded: {}, failed: {}",
        report.embedded.len(),
        report.failures.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text() {
        assert_eq!(embedding_text(&Record::new("Heat")), "Heat");
        assert_eq!(
            embedding_text(&Record::new("Heat").with_description("  A heist thriller. ")),
            "Heat: A heist thriller."
        );
    }
}
