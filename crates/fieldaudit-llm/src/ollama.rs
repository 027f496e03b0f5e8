//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API, for running report
//! audits without sending documents to a hosted service.
//!
//! # Features
//!
//! - HTTP communication with the Ollama generate API
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use fieldaudit_llm::OllamaGenerator;
//!
//! let generator = OllamaGenerator::new("http://localhost:11434", "llama3").unwrap();
//! ```

use crate::{with_retries, LlmError};
use fieldaudit_domain::traits::TextGenerator;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for a single HTTP request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per generation
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API text generator
pub struct OllamaGenerator {
    endpoint: String,
    model: String,
    client: Client,
    max_retries: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaGenerator {
    /// Create a new Ollama generator
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama generator with a custom request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a new Ollama generator against the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn generate_once(&self, url: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(url)
            .json(&request_body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<OllamaGenerateResponse>()
            .map(|body| body.response)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

impl TextGenerator for OllamaGenerator {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let url = format!("{}/api/generate", self.endpoint);
        debug!("Calling Ollama model '{}' ({} chars)", self.model, prompt.len());
        with_retries(self.max_retries, || self.generate_once(&url, prompt))
    }
}
