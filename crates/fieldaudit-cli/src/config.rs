//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use fieldaudit_extractor::ExtractorConfig;
use fieldaudit_llm::{gemini, ollama};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Model used with Ollama when none is configured
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Text-generation provider
    #[serde(default)]
    pub llm: LlmSettings,

    /// Extraction cache backend
    #[serde(default)]
    pub cache: CacheSettings,

    /// Extraction limits
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Report output
    #[serde(default)]
    pub output: OutputSettings,
}

/// Text-generation provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Which provider to call
    #[serde(default)]
    pub provider: Provider,

    /// API endpoint; the provider's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name; the provider's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Attempts per generation call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Text-generation provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Local Ollama server
    #[default]
    Ollama,
    /// Google Gemini API
    Gemini,
    /// Canned empty replies, for dry runs
    Mock,
}

/// Extraction cache settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Storage backend
    #[serde(default)]
    pub backend: CacheBackend,

    /// Database file or directory; under `~/.fieldaudit` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Extraction cache backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// SQLite database file
    #[default]
    Sqlite,
    /// One text file per document
    Directory,
    /// Process memory, nothing persisted
    Memory,
}

/// Report output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory for CSV reports
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the configuration and default cache.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".fieldaudit"))
    }

    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        if self.llm.max_retries == 0 {
            return Err(CliError::Config("llm.max_retries must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Cache location, resolved against `~/.fieldaudit` when unset.
    pub fn cache_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.cache.path {
            return Ok(path.clone());
        }
        let file = match self.cache.backend {
            CacheBackend::Directory => "extracted_text",
            CacheBackend::Sqlite | CacheBackend::Memory => "cache.db",
        };
        Ok(Self::home()?.join(file))
    }
}

impl LlmSettings {
    /// Endpoint to call, falling back to the provider's default.
    pub fn endpoint(&self) -> &str {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => endpoint.as_str(),
            (None, Provider::Gemini) => gemini::DEFAULT_ENDPOINT,
            (None, Provider::Ollama | Provider::Mock) => ollama::DEFAULT_ENDPOINT,
        }
    }

    /// Model to request, falling back to the provider's default.
    pub fn model(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model.as_str(),
            (None, Provider::Gemini) => gemini::DEFAULT_MODEL,
            (None, Provider::Ollama | Provider::Mock) => DEFAULT_OLLAMA_MODEL,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            endpoint: None,
            model: None,
            api_key_env: default_api_key_env(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::Table,
            color: true,
        }
    }
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
