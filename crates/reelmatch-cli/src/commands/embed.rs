use anyhow::Result;

use reelmatch_core::schema::Database;
use reelmatch_etl::{embed_catalog, Config, OpenAiEmbedder};

pub async fn run_embed(config: &Config, force: bool) -> Result<()> {
    let embedder = OpenAiEmbedder::from_config(config)?;
    let db = Database::open(&config.database_path)?;

    println!("\n🧮 Embedding catalog with {}\n", embedder.model());

    let report = embed_catalog(&db, &db, &embedder, force).await?;

    for failure in &report.failures {
        eprintln!("  ✗ {}: {}", failure.title, failure.error);
    }
    println!("  Embedded: {}", report.embedded.len());
    println!("  Skipped (already embedded): {}", report.skipped);
    println!("  Failed: {}", report.failures.len());

    if !report.failures.is_empty() {
        anyhow::bail!("{} records could not be embedded", report.failures.len());
    }
    Ok(())
}
