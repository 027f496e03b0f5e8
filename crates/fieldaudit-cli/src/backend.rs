//! Runtime selection of the text generator, cache backend and document reader.

use crate::config::{CacheBackend, Config, Provider};
use crate::error::{CliError, Result};
use fieldaudit_domain::traits::{DocumentReader, TextGenerator, TextStore};
use fieldaudit_domain::NormalizedKey;
use fieldaudit_llm::{GeminiGenerator, LlmError, MockGenerator, OllamaGenerator};
use fieldaudit_store::{DirectoryStore, MemoryStore, SqliteStore, StoreError};
use std::fs;
use thiserror::Error;
use tracing::{debug, info};

/// The configured text-generation provider.
pub enum Generator {
    /// Local Ollama server
    Ollama(OllamaGenerator),
    /// Google Gemini API
    Gemini(GeminiGenerator),
    /// Canned replies
    Mock(MockGenerator),
}

impl Generator {
    /// Build the provider named in the configuration.
    ///
    /// Must be called outside the async runtime: the HTTP providers own a
    /// blocking client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = &config.llm;
        let timeout = config.extractor.generation_timeout();

        let generator = match llm.provider {
            Provider::Ollama => Generator::Ollama(
                OllamaGenerator::with_timeout(llm.endpoint(), llm.model(), timeout)?
                    .with_max_retries(llm.max_retries),
            ),
            Provider::Gemini => {
                let api_key = std::env::var(&llm.api_key_env).map_err(|_| {
                    CliError::Config(format!("Environment variable {} is not set", llm.api_key_env))
                })?;
                Generator::Gemini(
                    GeminiGenerator::new(llm.endpoint(), llm.model(), api_key, timeout)?
                        .with_max_retries(llm.max_retries),
                )
            }
            Provider::Mock => Generator::Mock(MockGenerator::new("")),
        };

        info!("Using {:?} provider with model '{}'", llm.provider, llm.model());
        Ok(generator)
    }
}

impl TextGenerator for Generator {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> std::result::Result<String, Self::Error> {
        match self {
            Generator::Ollama(generator) => generator.generate(prompt),
            Generator::Gemini(generator) => generator.generate(prompt),
            Generator::Mock(generator) => generator.generate(prompt),
        }
    }
}

/// The configured extraction cache backend.
pub enum Store {
    /// SQLite database file
    Sqlite(SqliteStore),
    /// One text file per document
    Directory(DirectoryStore),
    /// Process memory
    Memory(MemoryStore),
}

impl Store {
    /// Open the backend named in the configuration.
    pub fn open(config: &Config) -> Result<Self> {
        let store = match config.cache.backend {
            CacheBackend::Sqlite => {
                let path = config.cache_path()?;
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                debug!("Opening SQLite cache at {}", path.display());
                Store::Sqlite(SqliteStore::new(&path)?)
            }
            CacheBackend::Directory => {
                let path = config.cache_path()?;
                debug!("Opening directory cache at {}", path.display());
                Store::Directory(DirectoryStore::new(&path)?)
            }
            CacheBackend::Memory => Store::Memory(MemoryStore::new()),
        };
        Ok(store)
    }
}

impl TextStore for Store {
    type Error = StoreError;

    fn read(&self, key: &NormalizedKey) -> std::result::Result<Option<String>, Self::Error> {
        match self {
            Store::Sqlite(store) => store.read(key),
            Store::Directory(store) => store.read(key),
            Store::Memory(store) => store.read(key),
        }
    }

    fn write(&self, key: &NormalizedKey, value: &str) -> std::result::Result<(), Self::Error> {
        match self {
            Store::Sqlite(store) => store.write(key, value),
            Store::Directory(store) => store.write(key, value),
            Store::Memory(store) => store.write(key, value),
        }
    }
}

/// Errors from reading a document's text.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The PDF could not be parsed
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// The file is not a PDF and not UTF-8 text
    #[error("Document is neither a PDF nor UTF-8 text")]
    NotText,
}

/// Reads the text layer of a PDF, or non-PDF files as UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextReader;

const PDF_MAGIC: &[u8] = b"%PDF";

impl DocumentReader for FileTextReader {
    type Error = ReadError;

    fn read_text(&self, bytes: &[u8]) -> std::result::Result<String, Self::Error> {
        if bytes.starts_with(PDF_MAGIC) {
            return pdf_extract::extract_text_from_mem(bytes).map_err(|e| ReadError::Pdf(e.to_string()));
        }
        String::from_utf8(bytes.to_vec()).map_err(|_| ReadError::NotText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldaudit_domain::normalize;
    use tempfile::TempDir;

    #[test]
    fn test_plain_text_document() {
        let text = FileTextReader.read_text(b"Repair Notes: reseated PCB").unwrap();
        assert_eq!(text, "Repair Notes: reseated PCB");
    }

    #[test]
    fn test_binary_document_rejected() {
        let result = FileTextReader.read_text(&[0xff, 0xfe, 0xfd]);
        assert!(matches!(result, Err(ReadError::NotText)));
    }

    #[test]
    fn test_broken_pdf_rejected() {
        let result = FileTextReader.read_text(b"%PDF-1.7 truncated");
        assert!(matches!(result, Err(ReadError::Pdf(_))));
    }

    #[test]
    fn test_mock_provider() {
        let mut config = Config::default();
        config.llm.provider = Provider::Mock;
        let generator = Generator::from_config(&config).unwrap();
        assert_eq!(generator.generate("anything").unwrap(), "");
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let mut config = Config::default();
        config.llm.provider = Provider::Gemini;
        config.llm.api_key_env = "FIELDAUDIT_TEST_UNSET_KEY".to_string();
        assert!(matches!(Generator::from_config(&config), Err(CliError::Config(_))));
    }

    #[test]
    fn test_open_backends() {
        let dir = TempDir::new().unwrap();
        let key = normalize("job.pdf");

        for backend in [CacheBackend::Sqlite, CacheBackend::Directory, CacheBackend::Memory] {
            let mut config = Config::default();
            config.cache.backend = backend;
            config.cache.path = Some(dir.path().join(format!("{:?}", backend)).join("cache"));

            let store = Store::open(&config).unwrap();
            store.write(&key, "text").unwrap();
            assert_eq!(store.read(&key).unwrap().as_deref(), Some("text"));
        }
    }
}
