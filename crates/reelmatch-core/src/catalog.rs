//! Collaborator traits for reading and updating the catalog.
//!
//! The matching layer never talks to SQLite directly: batches are written
//! against these traits so they can run over any store (and over in-memory
//! fakes in tests).

use crate::error::Result;
use crate::model::{Record, RecordId};

/// Supplies the catalog snapshot for one resolution batch.
pub trait CatalogProvider {
    /// List every record in stable input order. May be empty.
    fn list_records(&self) -> Result<Vec<Record>>;
}

/// Persists the results of a resolution batch, one record at a time.
///
/// Errors are per record; callers collect them rather than aborting.
pub trait RecordStore {
    /// Associate an image path with a record.
    fn update_image_ref(&self, id: &RecordId, path: &str) -> Result<()>;

    /// Attach (or replace) the semantic vector of a record.
    fn update_embedding(&self, id: &RecordId, embedding: &[f32]) -> Result<()>;
}
