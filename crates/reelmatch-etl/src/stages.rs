//! treadle stages wrapping the image-link and embedding batches.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use reelmatch_core::schema::Database;
use treadle::{Stage, StageContext, StageOutcome, TreadleError};

use crate::embed::{compute_embeddings, records_to_embed, store_embeddings, EmbedReport};
use crate::embedding::EmbeddingProvider;
use crate::images::ImageFolder;
use crate::link::{link_images, LinkOptions, LinkReport};

fn stage_error(what: &str, e: impl fmt::Display) -> TreadleError {
    TreadleError::StageExecution(format!("{what}: {e}"))
}

/// The link-images stage: match image files to records and store paths.
#[derive(Debug)]
pub struct LinkImagesStage {
    folder: PathBuf,
    db_path: PathBuf,
    options: LinkOptions,
}

impl LinkImagesStage {
    #[must_use]
    pub fn new(folder: PathBuf, db_path: PathBuf, options: LinkOptions) -> Self {
        Self {
            folder,
            db_path,
            options,
        }
    }

    /// Run the batch once.
    pub fn run(&self) -> crate::ResolveResult<LinkReport> {
        let db = Database::open(&self.db_path)?;
        let folder = ImageFolder::open(&self.folder)?;
        link_images(&db, &db, &folder, &self.options)
    }
}

#[async_trait::async_trait]
impl Stage for LinkImagesStage {
    fn name(&self) -> &str {
        "link-images"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        _context: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Linking images from {}", self.folder.display());

        let report = self.run().map_err(|e| stage_error("Image linking failed", e))?;
        link_outcome(&report)
    }
}

/// The embed stage: fetch vectors for records that lack one.
pub struct EmbedStage {
    db_path: PathBuf,
    provider: Arc<dyn EmbeddingProvider>,
    force: bool,
}

impl fmt::Debug for EmbedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedStage")
            .field("db_path", &self.db_path)
            .field("force", &self.force)
            .finish_non_exhaustive()
    }
}

impl EmbedStage {
    #[must_use]
    pub fn new(db_path: PathBuf, provider: Arc<dyn EmbeddingProvider>, force: bool) -> Self {
        Self {
            db_path,
            provider,
            force,
        }
    }

    /// Run the batch once. The database is only open while no request is
    /// in flight.
    pub async fn run(&self) -> crate::ResolveResult<EmbedReport> {
        let mut report = EmbedReport::default();

        let pending = {
            let db = Database::open(&self.db_path)?;
            records_to_embed(&db, self.force, &mut report)?
        };
        log::info!("Embedding {} records", pending.len());

        let computed = compute_embeddings(self.provider.as_ref(), pending, &mut report).await;

        let db = Database::open(&self.db_path)?;
        store_embeddings(&db, computed, &mut report);
        Ok(report)
    }
}

#[async_trait::async_trait]
impl Stage for EmbedStage {
    fn name(&self) -> &str {
        "embed"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        _context: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        let report = self
            .run()
            .await
            .map_err(|e| stage_error("Embedding failed", e))?;

        log::info!(
            "Embedding complete: {} embedded, {} failed",
            report.embedded.len(),
            report.failures.len()
        );
        embed_outcome(&report)
    }
}

/// A link run with any failed write fails the stage so it can be retried.
fn link_outcome(report: &LinkReport) -> treadle::Result<StageOutcome> {
    if report.has_failures() {
        return Err(TreadleError::StageExecution(format!(
            "{} image updates failed",
            report.failures.len()
        )));
    }
    Ok(StageOutcome::Complete)
}

fn embed_outcome(report: &EmbedReport) -> treadle::Result<StageOutcome> {
    if report.failures.is_empty() {
        Ok(StageOutcome::Complete)
    } else {
        Err(TreadleError::StageExecution(format!(
            "{} records could not be embedded",
            report.failures.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbedFailure;
    use crate::error::{ResolveError, ResolveResult};
    use crate::link::LinkFailure;
    use reelmatch_core::model::{Record, RecordId};
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug)]
    struct LengthEmbedder;

    #[async_trait::async_trait]
    impl EmbeddingProvider for LengthEmbedder {
        async fn embed(&self, text: &str) -> ResolveResult<Vec<f32>> {
            if text.starts_with("Broken") {
                return Err(ResolveError::Provider {
                    provider: "fake".to_string(),
                    message: "refused".to_string(),
                });
            }
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    fn seeded_db(dir: &TempDir, titles: &[&str]) -> PathBuf {
        let db_path = dir.path().join("catalog.db");
        let db = Database::open(&db_path).unwrap();
        for title in titles {
            db.insert_record(&Record::new(*title)).unwrap();
        }
        db_path
    }

    #[test]
    fn test_link_images_stage_run() {
        let dir = TempDir::new().unwrap();
        let db_path = seeded_db(&dir, &["Heat", "Alien"]);
        let folder = dir.path().join("images");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("heat.jpg"), b"").unwrap();
        fs::write(folder.join("Screenshot_2023.png"), b"").unwrap();

        let stage = LinkImagesStage::new(folder, db_path.clone(), LinkOptions::default());
        let report = stage.run().unwrap();

        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.skipped_generic, vec!["Screenshot_2023.png"]);
        assert!(link_outcome(&report).is_ok());

        let stats = Database::open(&db_path).unwrap().catalog_stats().unwrap();
        assert_eq!(stats.with_image, 1);
    }

    #[test]
    fn test_link_images_stage_missing_folder() {
        let dir = TempDir::new().unwrap();
        let db_path = seeded_db(&dir, &["Heat"]);
        let stage = LinkImagesStage::new(dir.path().join("missing"), db_path, LinkOptions::default());
        assert!(matches!(stage.run(), Err(ResolveError::FolderNotFound(_))));
    }

    #[test]
    fn test_failed_writes_fail_the_stage() {
        let report = LinkReport {
            failures: vec![LinkFailure {
                file: "heat.jpg".to_string(),
                record_id: RecordId::new(),
                error: "disk full".to_string(),
            }],
            ..LinkReport::default()
        };
        assert!(matches!(
            link_outcome(&report),
            Err(TreadleError::StageExecution(msg)) if msg.contains("1 image updates failed")
        ));

        let report = EmbedReport {
            failures: vec![EmbedFailure {
                record_id: RecordId::new(),
                title: "Heat".to_string(),
                error: "refused".to_string(),
            }],
            ..EmbedReport::default()
        };
        assert!(matches!(
            embed_outcome(&report),
            Err(TreadleError::StageExecution(_))
        ));
        assert!(embed_outcome(&EmbedReport::default()).is_ok());
    }

    #[tokio::test]
    async fn test_embed_stage_run() {
        let dir = TempDir::new().unwrap();
        let db_path = seeded_db(&dir, &["Heat", "Broken Arrow"]);

        let stage = EmbedStage::new(db_path.clone(), Arc::new(LengthEmbedder), false);
        let report = stage.run().await.unwrap();

        assert_eq!(report.embedded.len(), 1);
        assert_eq!(report.embedded[0].title, "Heat");
        assert_eq!(report.failures.len(), 1);
        assert!(embed_outcome(&report).is_err());

        let stats = Database::open(&db_path).unwrap().catalog_stats().unwrap();
        assert_eq!(stats.with_embedding, 1);
    }
}
