//! Matching error types.

use thiserror::Error;

/// Errors raised by the matchers.
///
/// Degenerate inputs (zero-norm vectors, empty labels) are not errors; they
/// simply produce no match.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// A query vector and a stored embedding have different lengths.
    #[error("embedding dimension mismatch: query has {query}, record {record_id} has {record}")]
    DimensionMismatch {
        query: usize,
        record: usize,
        record_id: String,
    },
}

/// Convenience alias for matching results.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
