//! Error types for the Extractor and the audit pipeline

use fieldaudit_store::CacheError;
use thiserror::Error;

/// Errors that stop extraction for a document
///
/// Generation failures are not in here: they degrade the extraction and are
/// reported as warnings instead.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Text-generation provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// A generation call did not finish in time
    #[error("Generation timed out after {0}s")]
    Timeout(u64),
}

/// Errors that fail a single document in a batch
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The file name normalizes to an empty cache key
    #[error("File name '{0}' has no letters or digits to key the cache with")]
    EmptyKey(String),

    /// Document text could not be read or cached
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Extraction could not run
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// A background task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}
