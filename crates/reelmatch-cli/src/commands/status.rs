use anyhow::Result;

use reelmatch_core::schema::Database;
use reelmatch_etl::Config;

pub fn show_status(config: &Config) -> Result<()> {
    let db = Database::open(&config.database_path)?;
    let stats = db.catalog_stats()?;
    let folder = config.image_folder();

    println!("\n📊 Reelmatch Status\n");
    println!("  Database: {}", config.database_path.display());
    println!(
        "  Image folder: {}{}",
        folder.display(),
        if folder.is_dir() { "" } else { " (missing)" }
    );
    println!("  Records: {}", stats.records);
    println!("  With image: {}", stats.with_image);
    println!("  With embedding: {}", stats.with_embedding);

    if stats.records == 0 {
        println!("\n  Run `reelmatch import <file.json>` to load records");
    } else if stats.with_embedding < stats.records {
        println!("\n  Run `reelmatch embed` to embed the remaining records");
    }

    Ok(())
}
