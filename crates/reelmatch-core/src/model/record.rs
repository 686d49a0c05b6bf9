use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::RecordId;

/// A canonical catalog record (a movie).
///
/// Records are created and persisted by the store; the matching layer only
/// ever reads them. `image` is filled in by the image-link batch and
/// `embedding` by the embedding batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,

    /// Free-text synopsis, used as embedding input alongside the title.
    #[serde(default)]
    pub description: String,

    pub genre: Option<String>,

    /// Release year.
    pub year: Option<i32>,

    /// Image path relative to the media root (e.g. `movie/images/heat.jpg`).
    pub image: Option<String>,

    /// Dense semantic vector. Absent until the embedding batch has run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            title: title.into(),
            description: String::new(),
            genre: None,
            year: None,
            image: None,
            embedding: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Whether a non-empty embedding is attached.
    #[must_use]
    pub fn has_embedding(&self) -> bool {
        self.embedding.as_ref().is_some_and(|e| !e.is_empty())
    }
}
