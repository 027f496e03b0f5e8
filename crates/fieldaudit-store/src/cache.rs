//! Extraction cache: document text addressed by normalized file name
//!
//! A hit returns the stored text even when the caller's document has changed
//! since it was cached. Entries are never invalidated, so re-uploading an
//! edited report under the same name audits the old text.

use fieldaudit_domain::traits::TextStore;
use fieldaudit_domain::NormalizedKey;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from the extraction cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store failed to read or write
    #[error("Store error: {0}")]
    Store(String),

    /// The producer could not supply the document text
    #[error("Failed to produce document text: {0}")]
    Produce(String),
}

/// Text returned by the cache, and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLookup {
    /// The document text
    pub text: String,
    /// Whether the text was already stored
    pub hit: bool,
}

/// Get-or-store front end over a [`TextStore`]
///
/// Misses on the same key are serialized by a per-key lock, so the producer
/// runs at most once per key and callers never observe a partial write.
/// Callers working on different keys do not wait on each other.
pub struct ExtractionCache<S> {
    store: S,
    key_locks: Mutex<HashMap<NormalizedKey, Arc<Mutex<()>>>>,
}

impl<S> ExtractionCache<S>
where
    S: TextStore,
    S::Error: Display,
{
    /// Wrap a backing store
    pub fn new(store: S) -> Self {
        Self {
            store,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the cached text for `key` without producing anything
    pub fn lookup(&self, key: &NormalizedKey) -> Result<Option<String>, CacheError> {
        self.store
            .read(key)
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    /// Return the cached text for `key`, producing and storing it on a miss
    ///
    /// A failing producer stores nothing.
    pub fn get_or_store<F, E>(&self, key: &NormalizedKey, produce: F) -> Result<CacheLookup, CacheError>
    where
        F: FnOnce() -> Result<String, E>,
        E: Display,
    {
        if let Some(text) = self.lookup(key)? {
            debug!("Cache hit for '{}'", key);
            return Ok(CacheLookup { text, hit: true });
        }

        let key_lock = self.key_lock(key);
        let result = {
            let _guard = key_lock.lock().unwrap_or_else(|p| p.into_inner());
            self.fill(key, produce)
        };
        self.release_key_lock(key, key_lock);
        result
    }

    /// Produce and store the text for `key`; the caller holds the key lock
    fn fill<F, E>(&self, key: &NormalizedKey, produce: F) -> Result<CacheLookup, CacheError>
    where
        F: FnOnce() -> Result<String, E>,
        E: Display,
    {
        // Another caller may have filled the entry while we waited.
        if let Some(text) = self.lookup(key)? {
            debug!("Cache hit for '{}' after waiting", key);
            return Ok(CacheLookup { text, hit: true });
        }

        let text = produce().map_err(|e| CacheError::Produce(e.to_string()))?;
        self.store
            .write(key, &text)
            .map_err(|e| CacheError::Store(e.to_string()))?;

        info!("Cached {} chars under '{}'", text.len(), key);

        // The store keeps the first write; return whatever it holds.
        let text = self.lookup(key)?.unwrap_or(text);
        Ok(CacheLookup { text, hit: false })
    }

    fn key_lock(&self, key: &NormalizedKey) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().unwrap_or_else(|p| p.into_inner());
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    /// Drop the map's entry for `key` once no other caller holds or awaits it
    fn release_key_lock(&self, key: &NormalizedKey, key_lock: Arc<Mutex<()>>) {
        let mut locks = self.key_locks.lock().unwrap_or_else(|p| p.into_inner());
        // One reference in the map, one here.
        if Arc::strong_count(&key_lock) == 2 {
            locks.remove(key);
        }
    }

    /// Number of keys with a lock currently allocated
    #[cfg(test)]
    fn locked_keys(&self) -> usize {
        self.key_locks.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}
