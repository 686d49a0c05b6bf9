//! The image-link batch: attach image files to the records they depict.
//!
//! Runs in two phases. Every file name is first resolved against one
//! catalog snapshot; the collected assignments are then written one at a
//! time. A write failure is recorded for that file and the batch moves on.

use std::collections::HashMap;

use reelmatch_core::model::RecordId;
use reelmatch_core::{CatalogProvider, RecordStore};
use reelmatch_search::{
    CatalogIndex, LabelResolution, LexicalMatcher, MatchMethod, Thresholds, Vocabulary,
};
use serde::Serialize;

use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use crate::images::{image_stem, FileEnumerator};

/// Settings for one image-link run.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Prefix of stored image paths.
    pub images_subdir: String,
    pub vocabulary: Vocabulary,
    pub thresholds: Thresholds,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            images_subdir: "movie/images".to_string(),
            vocabulary: Vocabulary::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl LinkOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            images_subdir: config.images_subdir.clone(),
            vocabulary: config.vocabulary.clone(),
            thresholds: config.matching,
        }
    }

    /// The path stored on a record for `file_name`.
    #[must_use]
    pub fn stored_path(&self, file_name: &str) -> String {
        let subdir = self.images_subdir.trim_end_matches('/');
        if subdir.is_empty() {
            file_name.to_string()
        } else {
            format!("{subdir}/{file_name}")
        }
    }
}

/// A file written to a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedImage {
    pub file: String,
    pub record_id: RecordId,
    pub title: String,
    pub method: MatchMethod,
    pub score: f64,
    pub path: String,
}

/// A file no record matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedImage {
    pub file: String,
    /// Titles of the closest records, best first.
    pub suggestions: Vec<String>,
}

/// A file that resolved to a record already claimed earlier in the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateImage {
    pub file: String,
    pub title: String,
    /// The file that claimed the record first.
    pub kept: String,
}

/// A matched file whose write failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkFailure {
    pub file: String,
    pub record_id: RecordId,
    pub error: String,
}

/// Summary of an image-link run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkReport {
    /// Files with an image extension that were considered.
    pub scanned: usize,
    /// Files skipped for a non-image extension.
    pub ignored: usize,
    pub updated: Vec<LinkedImage>,
    pub skipped_generic: Vec<String>,
    pub unmatched: Vec<UnmatchedImage>,
    pub duplicates: Vec<DuplicateImage>,
    pub failures: Vec<LinkFailure>,
}

impl LinkReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

struct Assignment {
    file: String,
    record_id: RecordId,
    title: String,
    method: MatchMethod,
    score: f64,
}

/// Resolve every image in `files` against the catalog and store the
/// matches.
///
/// Each record receives at most one image per run; later files resolving
/// to the same record are reported as duplicates. Fails up front when the
/// catalog is empty or the folder cannot be listed.
pub fn link_images(
    catalog: &dyn CatalogProvider,
    store: &dyn RecordStore,
    files: &dyn FileEnumerator,
    options: &LinkOptions,
) -> ResolveResult<LinkReport> {
    let index = CatalogIndex::from_provider(catalog)?;
    if index.is_empty() {
        return Err(ResolveError::EmptyCatalog);
    }
    let matcher = LexicalMatcher::with_settings(&index, &options.vocabulary, options.thresholds);

    let mut report = LinkReport::default();
    let mut assignments: Vec<Assignment> = Vec::new();
    let mut claimed: HashMap<RecordId, usize> = HashMap::new();

    for file in files.list_files()? {
        let Some(stem) = image_stem(&file, &options.vocabulary) else {
            report.ignored += 1;
            continue;
        };
        report.scanned += 1;

        let outcome = match matcher.resolve_label(stem) {
            LabelResolution::Generic => {
                log::debug!("Skipping generic image name: {file}");
                report.skipped_generic.push(file);
                continue;
            }
            LabelResolution::Resolved(outcome) => outcome,
        };

        let (Some(record), Some(method)) = (outcome.matched, outcome.method) else {
            let suggestions: Vec<String> = outcome
                .suggestions
                .iter()
                .map(|s| s.record.title.clone())
                .collect();
            log::warn!(
                "No record found for image {file}. Suggestions: {}",
                if suggestions.is_empty() {
                    "none".to_string()
                } else {
                    suggestions.join(", ")
                }
            );
            report.unmatched.push(UnmatchedImage { file, suggestions });
            continue;
        };

        if let Some(&first) = claimed.get(&record.id) {
            log::warn!(
                "Image {file} also matches {:?}, already claimed by {}",
                record.title,
                assignments[first].file
            );
            report.duplicates.push(DuplicateImage {
                file,
                title: record.title.clone(),
                kept: assignments[first].file.clone(),
            });
            continue;
        }

        log::debug!("{file} -> {:?} ({method}, {:.3})", record.title, outcome.score);
        claimed.insert(record.id, assignments.len());
        assignments.push(Assignment {
            file,
            record_id: record.id,
            title: record.title.clone(),
            method,
            score: outcome.score,
        });
    }

    for assignment in assignments {
        let path = options.stored_path(&assignment.file);
        match store.update_image_ref(&assignment.record_id, &path) {
            Ok(()) => {
                log::info!("Updated image for: {}", assignment.title);
                report.updated.push(LinkedImage {
                    file: assignment.file,
                    record_id: assignment.record_id,
                    title: assignment.title,
                    method: assignment.method,
                    score: assignment.score,
                    path,
                });
            }
            Err(e) => {
                log::warn!("Failed to update image for {}: {e}", assignment.file);
                report.failures.push(LinkFailure {
                    file: assignment.file,
                    record_id: assignment.record_id,
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Finished linking images. Updated: {}, skipped generic: {}, unmatched: {}, failed: {}",
        report.updated.len(),
        report.skipped_generic.len(),
        report.unmatched.len(),
        report.failures.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelmatch_core::model::Record;
    use reelmatch_core::schema::Database;
    use std::io;

    struct Files(Vec<&'static str>);

    impl FileEnumerator for Files {
        fn list_files(&self) -> io::Result<Vec<String>> {
            Ok(self.0.iter().map(|s| (*s).to_string()).collect())
        }
    }

    fn seeded(titles: &[&str]) -> Database {
        let db = Database::open_in_memory().unwrap();
        for title in titles {
            db.insert_record(&Record::new(*title)).unwrap();
        }
        db
    }

    #[test]
    fn test_stored_path() {
        let options = LinkOptions::default();
        assert_eq!(options.stored_path("heat.jpg"), "movie/images/heat.jpg");

        let options = LinkOptions {
            images_subdir: "posters/".to_string(),
            ..LinkOptions::default()
        };
        assert_eq!(options.stored_path("heat.jpg"), "posters/heat.jpg");
    }

    #[test]
    fn test_link_images_end_to_end() {
        let db = seeded(&["The Matrix", "Heat", "Amélie"]);
        let files = Files(vec![
            "The_Matrix.jpg",
            "poster_amelie(1).PNG",
            "Screenshot_2023.png",
            "notes.txt",
            "zzzz.jpg",
        ]);

        let report = link_images(&db, &db, &files, &LinkOptions::default()).unwrap();

        assert_eq!(report.scanned, 4);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.updated.len(), 2);
        assert_eq!(report.skipped_generic, vec!["Screenshot_2023.png"]);
        assert_eq!(report.unmatched.len(), 1);
        assert_eq!(report.unmatched[0].file, "zzzz.jpg");
        assert!(report.unmatched[0].suggestions.len() <= 3);
        assert!(!report.has_failures());

        let matrix = db
            .list_records()
            .unwrap()
            .into_iter()
            .find(|r| r.title == "The Matrix")
            .unwrap();
        assert_eq!(matrix.image.as_deref(), Some("movie/images/The_Matrix.jpg"));
    }

    #[test]
    fn test_record_is_linked_once_per_batch() {
        let db = seeded(&["Heat"]);
        let files = Files(vec!["heat.jpg", "m_heat_2.jpg"]);

        let report = link_images(&db, &db, &files, &LinkOptions::default()).unwrap();

        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.updated[0].file, "heat.jpg");
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].file, "m_heat_2.jpg");
        assert_eq!(report.duplicates[0].kept, "heat.jpg");
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let db = seeded(&[]);
        let err = link_images(&db, &db, &Files(vec!["heat.jpg"]), &LinkOptions::default())
            .unwrap_err();
        assert!(matches!(err, ResolveError::EmptyCatalog));
    }
}
