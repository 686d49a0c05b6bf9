use thiserror::Error;

/// Errors raised by the record store.
#[derive(Debug, Error)]
pub enum Error {
    /// An error propagated from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An update or lookup addressed a record that does not exist.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Stored data could not be decoded, such as a ragged embedding blob.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::NotFound {
            entity: "record",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "not found: record with id 42");
        assert_eq!(
            Error::InvalidData("blob of 3 bytes".to_string()).to_string(),
            "invalid data: blob of 3 bytes"
        );
    }
}
