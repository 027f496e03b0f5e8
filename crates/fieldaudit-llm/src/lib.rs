//! Fieldaudit Text-Generation Providers
//!
//! Pluggable implementations of the `TextGenerator` trait from
//! `fieldaudit-domain`.
//!
//! # Providers
//!
//! - `MockGenerator`: Deterministic mock for testing
//! - `OllamaGenerator`: Local Ollama API integration
//! - `GeminiGenerator`: Google Generative Language API
//!
//! # Examples
//!
//! ```
//! use fieldaudit_llm::MockGenerator;
//! use fieldaudit_domain::traits::TextGenerator;
//!
//! let generator = MockGenerator::new("Hello from LLM!");
//! let result = generator.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod ollama;

use fieldaudit_domain::traits::TextGenerator;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub use gemini::GeminiGenerator;
pub use ollama::OllamaGenerator;

/// Errors that can occur during text generation
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfigured (missing key, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether another attempt might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::RateLimitExceeded)
    }
}

/// Run `attempt` up to `max_retries` times with exponential backoff (1s, 2s, 4s, ...)
///
/// Only retryable errors are retried; anything else is returned immediately.
pub(crate) fn with_retries<F>(max_retries: u32, mut attempt: F) -> Result<String, LlmError>
where
    F: FnMut() -> Result<String, LlmError>,
{
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries.max(1) {
        match attempt() {
            Ok(text) => return Ok(text),
            Err(e) if e.is_retryable() => {
                warn!("Generation attempt {} failed: {}", attempts + 1, e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }

        attempts += 1;
        if attempts < max_retries {
            thread::sleep(Duration::from_secs(2u64.pow(attempts - 1)));
        }
    }

    Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

#[derive(Debug, Default)]
struct MockState {
    rules: Vec<(String, MockReply)>,
    prompts: Vec<String>,
}

/// Mock text generator for deterministic testing
///
/// Returns pre-configured replies without making any network calls. Rules
/// match when the prompt *contains* the configured fragment, checked in the
/// order they were added; unmatched prompts get the default reply.
///
/// # Examples
///
/// ```
/// use fieldaudit_llm::MockGenerator;
/// use fieldaudit_domain::traits::TextGenerator;
///
/// let generator = MockGenerator::new("fallback")
///     .with_response("arrival", "Engineer arrival Dt/time: 07-Oct-2024, 11:00 AM")
///     .with_error("audit summary");
///
/// assert!(generator.generate("Extract the arrival time").unwrap().contains("07-Oct-2024"));
/// assert!(generator.generate("Write an audit summary").is_err());
/// assert_eq!(generator.generate("anything else").unwrap(), "fallback");
/// ```
#[derive(Debug, Clone)]
pub struct MockGenerator {
    default_response: String,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl MockGenerator {
    /// Create a new MockGenerator with a fixed reply for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            delay: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Reply with `response` to prompts containing `fragment`
    pub fn with_response(self, fragment: impl Into<String>, response: impl Into<String>) -> Self {
        self.lock()
            .rules
            .push((fragment.into(), MockReply::Text(response.into())));
        self
    }

    /// Fail prompts containing `fragment`
    pub fn with_error(self, fragment: impl Into<String>) -> Self {
        self.lock().rules.push((fragment.into(), MockReply::Error));
        self
    }

    /// Sleep for `delay` before every reply
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.lock().prompts.len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        self.lock().prompts.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl TextGenerator for MockGenerator {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        let mut state = self.lock();
        state.prompts.push(prompt.to_string());

        let reply = state
            .rules
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_generator_default() {
        let generator = MockGenerator::new("Test response");
        let result = generator.generate("any prompt");
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_generator_rules_in_order() {
        let generator = MockGenerator::default()
            .with_response("hello", "world")
            .with_response("hello there", "never reached");

        assert_eq!(generator.generate("say hello there").unwrap(), "world");
        assert_eq!(generator.generate("unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_generator_call_count() {
        let generator = MockGenerator::new("test");
        assert_eq!(generator.call_count(), 0);

        generator.generate("prompt1").unwrap();
        generator.generate("prompt2").unwrap();
        assert_eq!(generator.call_count(), 2);
        assert_eq!(generator.prompts(), vec!["prompt1".to_string(), "prompt2".to_string()]);

        generator.reset_call_count();
        assert_eq!(generator.call_count(), 0);
    }

    #[test]
    fn test_mock_generator_error() {
        let generator = MockGenerator::default().with_error("bad prompt");
        let result = generator.generate("a bad prompt");
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[test]
    fn test_mock_generator_clone_shares_state() {
        let first = MockGenerator::new("test");
        let second = first.clone();

        first.generate("test").unwrap();

        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[test]
    fn test_retries_stop_on_non_retryable() {
        let mut calls = 0;
        let result = with_retries(3, || {
            calls += 1;
            Err(LlmError::ModelNotAvailable("m".to_string()))
        });
        assert!(matches!(result, Err(LlmError::ModelNotAvailable(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_retries_return_first_success() {
        let mut calls = 0;
        let result = with_retries(1, || {
            calls += 1;
            Ok("done".to_string())
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_single_attempt_surfaces_communication_error() {
        let result = with_retries(1, || Err(LlmError::Communication("down".to_string())));
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
