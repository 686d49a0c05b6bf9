//! Error types for the resolution batches.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while linking images, embedding records, or recommending.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A required setting, such as the provider API key, is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The embedding provider failed or returned an unusable response.
    #[error("provider error from {provider}: {message}")]
    Provider { provider: String, message: String },

    /// The embedding provider answered with a rate-limit response.
    #[error("rate limited by {provider}")]
    RateLimited { provider: String },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog holds no records, as opposed to holding no match.
    #[error("catalog is empty")]
    EmptyCatalog,

    /// A recommendation was asked for with a blank prompt.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// The image folder does not exist.
    #[error("image folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// The matcher rejected its input.
    #[error("search error: {0}")]
    Search(#[from] reelmatch_search::SearchError),

    /// An error propagated from the record store.
    #[error("database error: {0}")]
    Database(#[from] reelmatch_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolveError {
    /// Returns `true` when the error is transient and the request may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Convenience alias for resolution results.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
