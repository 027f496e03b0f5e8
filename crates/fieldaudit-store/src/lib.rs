//! Fieldaudit Storage Layer
//!
//! Implements the `TextStore` trait and the extraction cache built on it.
//!
//! # Architecture
//!
//! - `MemoryStore`: process-local map, used in tests
//! - `SqliteStore`: durable single-file store
//! - `DirectoryStore`: durable, one `<key>.txt` file per document
//! - `ExtractionCache`: get-or-store front end with per-key locking
//!
//! Every backend is append-only: the first value written under a key is kept
//! and later writes to that key are ignored.
//!
//! # Examples
//!
//! ```
//! use fieldaudit_domain::normalize;
//! use fieldaudit_store::{ExtractionCache, MemoryStore};
//!
//! let cache = ExtractionCache::new(MemoryStore::new());
//! let key = normalize("Report 1.pdf");
//!
//! let first = cache.get_or_store(&key, || Ok::<_, std::io::Error>("text".to_string())).unwrap();
//! assert!(!first.hit);
//!
//! let second = cache.get_or_store(&key, || Ok::<_, std::io::Error>("other".to_string())).unwrap();
//! assert!(second.hit);
//! assert_eq!(second.text, "text");
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod directory;

use fieldaudit_domain::traits::TextStore;
use fieldaudit_domain::NormalizedKey;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock};
use thiserror::Error;

pub use cache::{CacheError, CacheLookup, ExtractionCache};
pub use directory::DirectoryStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    key TEXT PRIMARY KEY NOT NULL,
    text TEXT NOT NULL,
    stored_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

/// SQLite-based implementation of TextStore
///
/// The connection sits behind a mutex so the store can be shared; each
/// operation holds it for a single statement.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fieldaudit_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("fieldaudit.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored documents
    pub fn len(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| StoreError::InvalidData(format!("Negative row count {}", count)))
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TextStore for SqliteStore {
    type Error = StoreError;

    fn read(&self, key: &NormalizedKey) -> Result<Option<String>, Self::Error> {
        let text = self
            .conn()
            .query_row(
                "SELECT text FROM documents WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }

    fn write(&self, key: &NormalizedKey, value: &str) -> Result<(), Self::Error> {
        self.conn().execute(
            "INSERT OR IGNORE INTO documents (key, text) VALUES (?1, ?2)",
            params![key.as_str(), value],
        )?;
        Ok(())
    }
}

/// In-memory implementation of TextStore
///
/// Counts accepted writes so tests can check that a key was written once.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<NormalizedKey, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes that stored a value
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or_else(|p| p.into_inner().len())
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TextStore for MemoryStore {
    type Error = StoreError;

    fn read(&self, key: &NormalizedKey) -> Result<Option<String>, Self::Error> {
        let entries = self.entries.read().unwrap_or_else(|p| p.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &NormalizedKey, value: &str) -> Result<(), Self::Error> {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        if !entries.contains_key(key) {
            entries.insert(key.clone(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
