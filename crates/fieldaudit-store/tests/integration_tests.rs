//! Integration tests for fieldaudit-store
//!
//! These tests verify that cached text survives reopening the durable backends.

use fieldaudit_domain::normalize;
use fieldaudit_domain::traits::TextStore;
use fieldaudit_store::{DirectoryStore, ExtractionCache, SqliteStore};
use std::convert::Infallible;
use tempfile::TempDir;

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
    assert!(store.unwrap().is_empty().unwrap());
}

#[test]
fn test_sqlite_cache_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cache.db");
    let key = normalize("Work Order 118.pdf");

    {
        let cache = ExtractionCache::new(SqliteStore::new(&db_path).unwrap());
        let lookup = cache
            .get_or_store(&key, || Ok::<_, Infallible>("Repair Notes: reseated PCB".to_string()))
            .unwrap();
        assert!(!lookup.hit);
    }

    let cache = ExtractionCache::new(SqliteStore::new(&db_path).unwrap());
    let lookup = cache
        .get_or_store(&key, || -> Result<String, Infallible> { panic!("producer must not run on a hit") })
        .unwrap();

    assert!(lookup.hit);
    assert_eq!(lookup.text, "Repair Notes: reseated PCB");
}

#[test]
fn test_directory_cache_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let key = normalize("Work Order 118.pdf");

    {
        let store = DirectoryStore::new(dir.path()).unwrap();
        store.write(&key, "Closure Code: PCB").unwrap();
    }

    let cache = ExtractionCache::new(DirectoryStore::new(dir.path()).unwrap());
    assert_eq!(cache.lookup(&key).unwrap().as_deref(), Some("Closure Code: PCB"));
}

#[test]
fn test_unknown_key_lookup_is_none() {
    let cache = ExtractionCache::new(SqliteStore::new(":memory:").unwrap());
    assert_eq!(cache.lookup(&normalize("missing.pdf")).unwrap(), None);
}
