use anyhow::Result;
use std::path::PathBuf;

use reelmatch_core::model::RecordId;
use reelmatch_core::schema::Database;
use reelmatch_core::RecordStore;
use reelmatch_etl::{link_images, Config, ImageFolder, LinkOptions, LinkReport};

/// A store that accepts every write and keeps nothing.
#[derive(Debug)]
struct DryRunStore;

impl RecordStore for DryRunStore {
    fn update_image_ref(&self, _id: &RecordId, _path: &str) -> reelmatch_core::Result<()> {
        Ok(())
    }

    fn update_embedding(&self, _id: &RecordId, _embedding: &[f32]) -> reelmatch_core::Result<()> {
        Ok(())
    }
}

pub fn run_link_images(config: &Config, folder: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let folder = folder.unwrap_or_else(|| config.image_folder());
    let options = LinkOptions::from_config(config);

    println!("\n🖼  Linking images");
    println!("  Folder: {}", folder.display());
    println!("  Database: {}", config.database_path.display());
    if dry_run {
        println!("  Dry run: nothing will be written");
    }
    println!();

    let db = Database::open(&config.database_path)?;
    let images = ImageFolder::open(&folder)?;
    let report = if dry_run {
        link_images(&db, &DryRunStore, &images, &options)?
    } else {
        link_images(&db, &db, &images, &options)?
    };

    print_report(&report);
    Ok(())
}

fn print_report(report: &LinkReport) {
    for linked in &report.updated {
        println!(
            "  ✓ {} → {} ({}, {:.2})",
            linked.file, linked.title, linked.method, linked.score
        );
    }
    for unmatched in &report.unmatched {
        let suggestions = if unmatched.suggestions.is_empty() {
            "no suggestions".to_string()
        } else {
            unmatched.suggestions.join(", ")
        };
        println!("  ? {}: no match. Suggestions: {suggestions}", unmatched.file);
    }
    for duplicate in &report.duplicates {
        println!(
            "  = {}: {} already linked from {}",
            duplicate.file, duplicate.title, duplicate.kept
        );
    }
    for failure in &report.failures {
        eprintln!("  ✗ {}: {}", failure.file, failure.error);
    }

    println!("\nSummary");
    println!("  Images scanned:  {}", report.scanned);
    println!("  Updated:         {}", report.updated.len());
    println!("  Skipped generic: {}", report.skipped_generic.len());
    println!("  Unmatched:       {}", report.unmatched.len());
    println!("  Duplicates:      {}", report.duplicates.len());
    println!("  Failed:          {}", report.failures.len());
    if report.ignored > 0 {
        println!("  Non-image files: {}", report.ignored);
    }
}
