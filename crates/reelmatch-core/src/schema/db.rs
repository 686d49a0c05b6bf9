use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::catalog::{CatalogProvider, RecordStore};
use crate::error::{Error, Result};
use crate::model::{Record, RecordId};

use super::migrations::MIGRATIONS;

const RECORD_COLUMNS: &str =
    "id, title, description, genre, year, image, embedding, created_at, updated_at";

/// Counts shown by `reelmatch status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub records: usize,
    pub with_embedding: usize,
    pub with_image: usize,
}

/// A database connection with CRUD methods for catalog records.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Record CRUD
impl Database {
    /// Insert a new record.
    pub fn insert_record(&self, record: &Record) -> Result<()> {
        self.conn.execute(
            "INSERT INTO records (
                id, title, description, genre, year, image, embedding,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                record.id.to_string(),
                record.title,
                record.description,
                record.genre,
                record.year.map(i64::from),
                record.image,
                record.embedding.as_deref().map(encode_embedding),
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List all records in insertion order.
    pub fn list_records(&self) -> Result<Vec<Record>> {
        self.query_records(&format!(
            "SELECT {RECORD_COLUMNS} FROM records ORDER BY rowid"
        ))
    }

    /// List records that have no embedding yet, in insertion order.
    pub fn list_records_without_embedding(&self) -> Result<Vec<Record>> {
        self.query_records(&format!(
            "SELECT {RECORD_COLUMNS} FROM records
             WHERE embedding IS NULL OR length(embedding) = 0
             ORDER BY rowid"
        ))
    }

    /// Get a record by ID.
    pub fn get_record_by_id(&self, id: &RecordId) -> Result<Option<Record>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"),
                [id.to_string()],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Pick one record at random, if any exist.
    pub fn random_record(&self) -> Result<Option<Record>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM records ORDER BY RANDOM() LIMIT 1"),
                [],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Count all records.
    pub fn count_records(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Counts of records, embedded records, and records with an image.
    pub fn catalog_stats(&self) -> Result<CatalogStats> {
        let (records, with_embedding, with_image): (i64, i64, i64) = self.conn.query_row(
            "SELECT COUNT(*),
                    COUNT(CASE WHEN length(embedding) > 0 THEN 1 END),
                    COUNT(image)
             FROM records",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(CatalogStats {
            records: usize::try_from(records).unwrap_or(0),
            with_embedding: usize::try_from(with_embedding).unwrap_or(0),
            with_image: usize::try_from(with_image).unwrap_or(0),
        })
    }

    /// Set the image path of a record.
    pub fn update_image(&self, id: &RecordId, path: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE records SET image = ?2, updated_at = ?3 WHERE id = ?1",
            rusqlite::params![id.to_string(), path, chrono::Utc::now().to_rfc3339()],
        )?;
        ensure_updated(changed, id)
    }

    /// Set the embedding of a record.
    pub fn update_embedding(&self, id: &RecordId, embedding: &[f32]) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE records SET embedding = ?2, updated_at = ?3 WHERE id = ?1",
            rusqlite::params![
                id.to_string(),
                encode_embedding(embedding),
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        ensure_updated(changed, id)
    }

    fn query_records(&self, sql: &str) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

impl CatalogProvider for Database {
    fn list_records(&self) -> Result<Vec<Record>> {
        Database::list_records(self)
    }
}

impl RecordStore for Database {
    fn update_image_ref(&self, id: &RecordId, path: &str) -> Result<()> {
        self.update_image(id, path)
    }

    fn update_embedding(&self, id: &RecordId, embedding: &[f32]) -> Result<()> {
        Database::update_embedding(self, id, embedding)
    }
}

fn ensure_updated(changed: usize, id: &RecordId) -> Result<()> {
    if changed == 0 {
        return Err(Error::NotFound {
            entity: "record",
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Serialize a vector as packed little-endian `f32`s.
#[must_use]
pub fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Inverse of [`encode_embedding`].
pub fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::InvalidData(format!(
            "embedding blob of {} bytes is not a whole number of f32 values",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn conversion_error(
    idx: usize,
    ty: Type,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(Into::into)
        .map_err(|e| conversion_error(idx, Type::Text, e))
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
    let id_str: String = row.get(0)?;
    let id = id_str
        .parse::<RecordId>()
        .map_err(|e| conversion_error(0, Type::Text, e))?;

    let embedding = match row.get::<_, Option<Vec<u8>>>(6)? {
        Some(bytes) if !bytes.is_empty() => {
            Some(decode_embedding(&bytes).map_err(|e| conversion_error(6, Type::Blob, e))?)
        }
        _ => None,
    };

    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    #[allow(clippy::cast_possible_truncation)]
    let year = row.get::<_, Option<i64>>(4)?.map(|v| v as i32);

    Ok(Record {
        id,
        title: row.get(1)?,
        description: row.get(2)?,
        genre: row.get(3)?,
        year,
        image: row.get(5)?,
        embedding,
        created_at: parse_timestamp(7, &created_at_str)?,
        updated_at: parse_timestamp(8, &updated_at_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalog.db");
        drop(Database::open(&path).unwrap());
        let db = Database::open(&path).unwrap();
        assert_eq!(db.count_records().unwrap(), 0);
    }

    #[test]
    fn test_record_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let record = Record::new("Amélie")
            .with_description("A shy waitress decides to change the lives of those around her.")
            .with_genre("Comedy")
            .with_year(2001)
            .with_embedding(vec![0.25, -1.5, 3.0]);

        db.insert_record(&record).unwrap();

        let loaded = db.get_record_by_id(&record.id).unwrap().unwrap();
        assert_eq!(loaded.title, "Amélie");
        assert_eq!(loaded.year, Some(2001));
        assert_eq!(loaded.embedding, Some(vec![0.25, -1.5, 3.0]));
        assert!(loaded.image.is_none());
    }

    #[test]
    fn test_list_records_preserves_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        for title in ["Zodiac", "Alien", "Memento"] {
            db.insert_record(&Record::new(title)).unwrap();
        }

        let titles: Vec<String> = db
            .list_records()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Zodiac", "Alien", "Memento"]);
    }

    #[test]
    fn test_update_image_and_embedding() {
        let db = Database::open_in_memory().unwrap();
        let record = Record::new("Heat");
        db.insert_record(&record).unwrap();

        db.update_image(&record.id, "movie/images/heat.jpg").unwrap();
        Database::update_embedding(&db, &record.id, &[1.0, 0.0]).unwrap();

        let loaded = db.get_record_by_id(&record.id).unwrap().unwrap();
        assert_eq!(loaded.image.as_deref(), Some("movie/images/heat.jpg"));
        assert_eq!(loaded.embedding, Some(vec![1.0, 0.0]));
    }

    #[test]
    fn test_update_unknown_record_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db.update_image(&RecordId::new(), "x.jpg").unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "record", .. }));
    }

    #[test]
    fn test_list_records_without_embedding() {
        let db = Database::open_in_memory().unwrap();
        db.insert_record(&Record::new("Heat").with_embedding(vec![1.0]))
            .unwrap();
        db.insert_record(&Record::new("Ronin")).unwrap();

        let pending = db.list_records_without_embedding().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "Ronin");
    }

    #[test]
    fn test_catalog_stats() {
        let db = Database::open_in_memory().unwrap();
        db.insert_record(&Record::new("Heat").with_embedding(vec![1.0]))
            .unwrap();
        db.insert_record(&Record::new("Ronin").with_image("movie/images/ronin.png"))
            .unwrap();
        db.insert_record(&Record::new("Thief")).unwrap();

        let stats = db.catalog_stats().unwrap();
        assert_eq!(
            stats,
            CatalogStats {
                records: 3,
                with_embedding: 1,
                with_image: 1,
            }
        );
    }

    #[test]
    fn test_random_record_on_empty_database() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.random_record().unwrap().is_none());
    }

    #[test]
    fn test_decode_embedding_rejects_ragged_blob() {
        assert!(decode_embedding(&[0, 0, 128]).is_err());
        assert_eq!(decode_embedding(&encode_embedding(&[2.5])).unwrap(), vec![2.5]);
    }
}
