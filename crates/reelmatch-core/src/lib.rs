//! Core record model for reelmatch.
//!
//! This crate defines the catalog [`Record`](model::Record), the SQLite
//! schema that persists it, and the collaborator traits the matching and
//! batch layers consume ([`CatalogProvider`], [`RecordStore`]).

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod schema;

pub use catalog::{CatalogProvider, RecordStore};
pub use error::{Error, Result};
