use anyhow::Result;

use reelmatch_core::schema::Database;
use reelmatch_etl::{Config, ResolveError};
use reelmatch_search::{CatalogIndex, LabelResolution, Query};

pub fn run_resolve(config: &Config, label: &str) -> Result<()> {
    let db = Database::open(&config.database_path)?;
    let index = CatalogIndex::from_provider(&db)?;
    if index.is_empty() {
        return Err(ResolveError::EmptyCatalog.into());
    }

    let query = Query::Label(label.to_string());
    match index.resolve_with(&query, &config.vocabulary, config.matching)? {
        LabelResolution::Generic => {
            println!("{label:?} is a generic placeholder name and is not matched");
        }
        LabelResolution::Resolved(outcome) => match (outcome.matched, outcome.method) {
            (Some(record), Some(method)) => {
                println!("{label:?} → {}", record.title);
                println!("  method: {method}");
                println!("  score:  {:.4}", outcome.score);
                println!("  id:     {}", record.id);
            }
            _ => {
                println!("{label:?}: no match");
                for suggestion in &outcome.suggestions {
                    println!("  - {} ({:.2})", suggestion.record.title, suggestion.score);
                }
            }
        },
    }
    Ok(())
}
