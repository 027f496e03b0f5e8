//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the audit logic and the
//! services it depends on. Implementations live in other crates.

use crate::normalize::NormalizedKey;

/// Trait for a text-generation service
///
/// Implemented by the infrastructure layer (fieldaudit-llm). Replies are
/// free text with no enforced schema and may be empty or malformed.
pub trait TextGenerator {
    /// Error type for generation calls
    type Error;

    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for the key-value store backing the extraction cache
///
/// Implemented by the infrastructure layer (fieldaudit-store). Methods take
/// `&self` so one store can be shared between threads; implementations
/// handle their own locking.
pub trait TextStore {
    /// Error type for store operations
    type Error;

    /// Read the text stored under `key`
    fn read(&self, key: &NormalizedKey) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`
    ///
    /// If `key` already holds a value the existing value is kept.
    fn write(&self, key: &NormalizedKey, value: &str) -> Result<(), Self::Error>;
}

/// Trait for turning a document's bytes into plain text
///
/// Implemented at the application edge (fieldaudit-cli reads PDFs).
pub trait DocumentReader {
    /// Error type for text extraction
    type Error;

    /// Extract the text layer of a document
    fn read_text(&self, bytes: &[u8]) -> Result<String, Self::Error>;
}
