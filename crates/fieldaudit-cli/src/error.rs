//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text-generation provider could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] fieldaudit_llm::LlmError),

    /// Cache backend could not be opened
    #[error("Store error: {0}")]
    Store(#[from] fieldaudit_store::StoreError),

    /// Cache lookup failed
    #[error("Cache error: {0}")]
    Cache(#[from] fieldaudit_store::CacheError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV report could not be written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some documents in a batch could not be audited
    #[error("{failed} of {total} document(s) failed")]
    BatchFailed {
        /// Documents that failed
        failed: usize,
        /// Documents attempted
        total: usize,
    },
}
