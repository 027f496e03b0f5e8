//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum document text length (characters)
    pub max_text_length: usize,

    /// Maximum time for a single generation call (seconds)
    pub generation_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_text_length: 200_000,
            generation_timeout_secs: 120,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: short timeouts, small documents only
    pub fn aggressive() -> Self {
        Self {
            max_text_length: 50_000,
            generation_timeout_secs: 30,
        }
    }

    /// Lenient preset: long timeouts for slow local models
    pub fn lenient() -> Self {
        Self {
            max_text_length: 1_000_000,
            generation_timeout_secs: 600,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
