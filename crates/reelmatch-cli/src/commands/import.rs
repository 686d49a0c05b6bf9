use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use reelmatch_core::model::Record;
use reelmatch_core::schema::Database;

/// One entry of an import file.
#[derive(Debug, Deserialize)]
struct ImportRecord {
    title: String,
    #[serde(default)]
    description: String,
    genre: Option<String>,
    year: Option<i32>,
    image: Option<String>,
}

impl ImportRecord {
    fn into_record(self) -> Record {
        let mut record = Record::new(self.title.trim()).with_description(self.description);
        if let Some(genre) = self.genre {
            record = record.with_genre(genre);
        }
        if let Some(year) = self.year {
            record = record.with_year(year);
        }
        if let Some(image) = self.image {
            record = record.with_image(image);
        }
        record
    }
}

/// Parse an import file into records, dropping blank titles.
fn parse_records(contents: &str) -> Result<Vec<Record>> {
    let entries: Vec<ImportRecord> =
        serde_json::from_str(contents).context("Import file is not a JSON array of records")?;
    Ok(entries
        .into_iter()
        .filter(|entry| !entry.title.trim().is_empty())
        .map(ImportRecord::into_record)
        .collect())
}

/// Insert records from a JSON file, skipping titles already present.
///
/// Returns the number of records inserted.
pub fn import_records(db: &Database, contents: &str) -> Result<usize> {
    let mut known: HashSet<String> = db.list_records()?.into_iter().map(|r| r.title).collect();

    let mut inserted = 0;
    for record in parse_records(contents)? {
        if !known.insert(record.title.clone()) {
            log::debug!("Skipping existing title {:?}", record.title);
            continue;
        }
        db.insert_record(&record)?;
        inserted += 1;
    }
    Ok(inserted)
}

pub fn run_import(db_path: &Path, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let db = Database::open(db_path)?;

    let inserted = import_records(&db, &contents)?;
    println!("✓ Imported {inserted} records into {}", db_path.display());
    println!("  Catalog size: {}", db.count_records()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_skips_known_titles() {
        let db = Database::open_in_memory().unwrap();
        let json = r#"[
            {"title": "Heat", "description": "A heist thriller.", "year": 1995},
            {"title": "Alien", "genre": "Horror"},
            {"title": "Heat"},
            {"title": "   "}
        ]"#;

        assert_eq!(import_records(&db, json).unwrap(), 2);
        assert_eq!(import_records(&db, json).unwrap(), 0);

        let records = db.list_records().unwrap();
        assert_eq!(records[0].title, "Heat");
        assert_eq!(records[0].year, Some(1995));
        assert_eq!(records[1].genre.as_deref(), Some("Horror"));
    }

    #[test]
    fn test_import_rejects_non_array() {
        let db = Database::open_in_memory().unwrap();
        assert!(import_records(&db, r#"{"title": "Heat"}"#).is_err());
    }
}
