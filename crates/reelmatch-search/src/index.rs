//! The per-batch catalog snapshot the matchers scan.

use std::collections::{BTreeSet, HashMap};

use reelmatch_core::model::Record;
use reelmatch_core::CatalogProvider;

use crate::normalize::{normalize, tokenize};

/// A record with its derived comparison fields.
///
/// `normalized_title` and `tokens` are computed from `record.title` when
/// the index is built and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRecord {
    pub record: Record,
    pub normalized_title: String,
    pub tokens: BTreeSet<String>,
}

impl IndexedRecord {
    #[must_use]
    pub fn new(record: Record) -> Self {
        let normalized_title = normalize(&record.title);
        let tokens = tokenize(&record.title);
        Self {
            record,
            normalized_title,
            tokens,
        }
    }
}

/// An immutable catalog snapshot.
///
/// Holds the records in input order for linear scans, plus a map from
/// normalized title to record. When several titles normalize to the same
/// key the *last* one in input order owns it; the key itself keeps the
/// position where it was first seen.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    records: Vec<IndexedRecord>,
    by_key: HashMap<String, usize>,
    keys: Vec<String>,
}

impl CatalogIndex {
    /// Build an index from records in input order.
    #[must_use]
    pub fn build(records: Vec<Record>) -> Self {
        let mut index = Self {
            records: Vec::with_capacity(records.len()),
            by_key: HashMap::with_capacity(records.len()),
            keys: Vec::with_capacity(records.len()),
        };

        for (position, record) in records.into_iter().enumerate() {
            let indexed = IndexedRecord::new(record);
            match index.by_key.insert(indexed.normalized_title.clone(), position) {
                Some(previous) => log::debug!(
                    "Title key {:?} of {:?} shadows {:?}",
                    indexed.normalized_title,
                    indexed.record.title,
                    index.records[previous].record.title
                ),
                None => index.keys.push(indexed.normalized_title.clone()),
            }
            index.records.push(indexed);
        }

        index
    }

    /// Build an index from everything a provider lists.
    pub fn from_provider(provider: &dyn CatalogProvider) -> reelmatch_core::Result<Self> {
        Ok(Self::build(provider.list_records()?))
    }

    /// All records in input order.
    #[must_use]
    pub fn records(&self) -> &[IndexedRecord] {
        &self.records
    }

    /// Distinct normalized titles, in first-seen order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The record owning a normalized title.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&IndexedRecord> {
        self.by_key.get(key).map(|&position| &self.records[position])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_derives_keys_and_tokens() {
        let index = CatalogIndex::build(vec![Record::new("Star Wars: A New Hope")]);
        let entry = &index.records()[0];
        assert_eq!(entry.normalized_title, "starwarsanewhope");
        assert!(entry.tokens.contains("hope"));
        assert_eq!(entry.tokens.len(), 5);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let first = Record::new("Heat");
        let second = Record::new("HEAT!");
        let second_id = second.id;
        let index = CatalogIndex::build(vec![first, Record::new("Ronin"), second]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.get("heat").map(|r| r.record.id), Some(second_id));
        assert_eq!(index.keys(), &["heat".to_string(), "ronin".to_string()]);
    }

    #[test]
    fn test_empty_index() {
        let index = CatalogIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.get("").is_none());
    }
}
