//! Record matching for reelmatch.
//!
//! Resolves a free-form label (an image file stem) or a dense query vector
//! against an in-memory [`CatalogIndex`]. The lexical path runs a strict
//! cascade (exact, substring, fuzzy ratio, token overlap) and falls back to
//! ranked suggestions; the semantic path is an exhaustive cosine scan.
//!
//! Everything here is pure and synchronous: an index is built once per
//! batch from a record snapshot and can be shared across threads.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod generic;
pub mod index;
pub mod lexical;
pub mod normalize;
pub mod outcome;
pub mod query;
pub mod semantic;
pub mod similarity;
pub mod thresholds;
pub mod vocabulary;

pub use error::{SearchError, SearchResult};
pub use index::{CatalogIndex, IndexedRecord};
pub use lexical::LexicalMatcher;
pub use outcome::{LabelResolution, MatchMethod, MatchOutcome, Suggestion};
pub use query::Query;
pub use semantic::SemanticMatcher;
pub use thresholds::Thresholds;
pub use vocabulary::Vocabulary;
