use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use reelmatch_etl::{build_pipeline, CatalogJob, Config, LinkOptions, OpenAiEmbedder};

/// Run the link-images → embed pipeline under treadle.
///
/// Stage state is kept in `pipeline.db` next to the catalog database, so a
/// failed run resumes at the failed stage.
pub async fn run_process(config: &Config, folder: Option<PathBuf>) -> Result<()> {
    let folder = folder.unwrap_or_else(|| config.image_folder());
    let db_path = config.database_path.clone();

    println!("\n🎬 Reelmatch Processing Pipeline\n");
    println!("  Image folder: {}", folder.display());
    println!("  Database: {}", db_path.display());
    println!();

    let embedder = OpenAiEmbedder::from_config(config)?;
    let workflow = build_pipeline(
        folder.clone(),
        db_path.clone(),
        LinkOptions::from_config(config),
        Arc::new(embedder),
    )
    .context("Failed to build pipeline")?;

    let parent = db_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
    let state_path = parent.join("pipeline.db");
    let mut store = treadle::SqliteStateStore::open(&state_path)
        .await
        .context("Failed to open pipeline state store")?;

    let job = CatalogJob::new("process-job", folder.display().to_string());

    let mut events = workflow.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                treadle::WorkflowEvent::StageStarted { stage, .. } => {
                    println!("  ⏳ [{stage}] Starting...");
                }
                treadle::WorkflowEvent::StageCompleted { stage, .. } => {
                    println!("  ✓ [{stage}] Complete");
                }
                treadle::WorkflowEvent::StageFailed { stage, error, .. } => {
                    eprintln!("  ✗ [{stage}] FAILED: {error}");
                }
                _ => {}
            }
        }
    });

    workflow
        .advance(&job, &mut store)
        .await
        .context("Pipeline execution failed")?;

    println!("\n✓ Processing pipeline complete!");
    println!("\nNext steps:");
    println!("  - Run 'reelmatch status' to see catalog coverage");
    println!("  - Run 'reelmatch recommend <description>' to try a recommendation");

    Ok(())
}
