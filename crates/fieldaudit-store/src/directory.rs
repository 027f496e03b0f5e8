//! Directory-backed TextStore: one `<key>.txt` file per document

use crate::StoreError;
use fieldaudit_domain::traits::TextStore;
use fieldaudit_domain::NormalizedKey;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Durable store keeping each document as a text file
///
/// Writes go to a temporary file in the same directory and are then linked
/// into place without overwriting, so readers never see a partial file and
/// the first writer of a key wins.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory holding the documents
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for `key`
    pub fn path_for(&self, key: &NormalizedKey) -> PathBuf {
        self.root.join(format!("{}.txt", key))
    }
}

impl TextStore for DirectoryStore {
    type Error = StoreError;

    fn read(&self, key: &NormalizedKey) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &NormalizedKey, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        if path.exists() {
            return Ok(());
        }

        let mut file = NamedTempFile::new_in(&self.root)?;
        file.write_all(value.as_bytes())?;
        file.as_file().sync_all()?;

        match file.persist_noclobber(&path) {
            Ok(_) => Ok(()),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                debug!("'{}' was written concurrently, keeping existing file", path.display());
                Ok(())
            }
            Err(e) => Err(e.error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldaudit_domain::normalize;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_and_layout() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path()).unwrap();
        let key = normalize("Job Sheet 7.pdf");

        assert_eq!(store.read(&key).unwrap(), None);
        store.write(&key, "Closure Code: FAN-MOTOR").unwrap();

        assert_eq!(store.path_for(&key), dir.path().join("jobsheet7pdf.txt"));
        assert_eq!(store.read(&key).unwrap().as_deref(), Some("Closure Code: FAN-MOTOR"));
    }

    #[test]
    fn test_existing_file_is_not_replaced() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path()).unwrap();
        let key = normalize("a.pdf");

        store.write(&key, "first").unwrap();
        store.write(&key, "second").unwrap();

        assert_eq!(store.read(&key).unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn test_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("index").join("texts");
        let store = DirectoryStore::new(&nested).unwrap();
        assert!(store.root().is_dir());
    }
}
