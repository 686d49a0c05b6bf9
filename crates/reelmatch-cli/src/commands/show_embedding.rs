use anyhow::Result;
use std::path::Path;

use reelmatch_core::schema::Database;

/// Number of leading components printed.
const PREVIEW_LEN: usize = 8;

pub fn show_random_embedding(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;

    let Some(record) = db.random_record()? else {
        eprintln!("No records found in the database.");
        return Ok(());
    };
    println!("Random record selected: {}", record.title);

    match record.embedding.as_deref() {
        Some(embedding) if !embedding.is_empty() => {
            let preview: Vec<String> = embedding
                .iter()
                .take(PREVIEW_LEN)
                .map(|v| format!("{v:.6}"))
                .collect();
            let more = if embedding.len() > PREVIEW_LEN { ", ..." } else { "" };
            println!("Dimensions: {}", embedding.len());
            println!("Embedding: [{}{more}]", preview.join(", "));
        }
        _ => {
            eprintln!("No embedding found for this record. Run 'reelmatch embed' first.");
        }
    }
    Ok(())
}
