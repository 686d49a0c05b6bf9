use serde::{Deserialize, Serialize};
use std::fmt;
use treadle::WorkItem;

/// One pass over the catalog.
///
/// This is the treadle `WorkItem` that flows through the link-images →
/// embed stages. The stages read everything they need from the database,
/// so the item only carries an id and a label for progress output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogJob {
    id: String,
    pub label: String,
}

impl CatalogJob {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl WorkItem for CatalogJob {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CatalogJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_job_creation() {
        let job = CatalogJob::new("process-job", "/srv/media/movie/images");
        assert_eq!(job.id(), "process-job");
        assert_eq!(format!("{job}"), "/srv/media/movie/images");
    }
}
