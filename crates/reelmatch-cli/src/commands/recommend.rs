use anyhow::Result;

use reelmatch_core::schema::Database;
use reelmatch_etl::{recommend, Config, OpenAiEmbedder};

pub async fn run_recommend(config: &Config, prompt: &str) -> Result<()> {
    let embedder = OpenAiEmbedder::from_config(config)?;
    let db = Database::open(&config.database_path)?;

    match recommend(&db, &embedder, prompt).await? {
        Some(recommendation) => {
            let record = &recommendation.record;
            println!("🎬 {}", record.title);
            if let Some(year) = record.year {
                println!("  Year: {year}");
            }
            if let Some(genre) = &record.genre {
                println!("  Genre: {genre}");
            }
            if !record.description.is_empty() {
                println!("  {}", record.description);
            }
            println!("  Similarity: {:.4}", recommendation.similarity);
        }
        None => {
            println!("No record has an embedding yet. Run 'reelmatch embed' first.");
        }
    }
    Ok(())
}
