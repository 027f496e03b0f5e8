//! Gemini Provider Implementation
//!
//! Calls the Google Generative Language `generateContent` endpoint. The API
//! key is sent in the `x-goog-api-key` header.

use crate::{with_retries, LlmError};
use fieldaudit_domain::traits::TextGenerator;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default timeout for a single HTTP request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts per generation
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Gemini API text generator
pub struct GeminiGenerator {
    endpoint: String,
    model: String,
    api_key: String,
    client: Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        Some(
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

impl GeminiGenerator {
    /// Create a new Gemini generator
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("Gemini API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    fn generate_once(&self, url: &str, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
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
            .json::<GenerateContentResponse>()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?
            .into_text()
            .ok_or_else(|| LlmError::InvalidResponse("Response has no candidates".to_string()))
    }
}

impl TextGenerator for GeminiGenerator {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let url = self.url();
        debug!("Calling Gemini model '{}' ({} chars)", self.model, prompt.len());
        with_retries(self.max_retries, || self.generate_once(&url, prompt))
    }
}
