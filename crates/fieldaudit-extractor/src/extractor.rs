//! Core FieldExtractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::{find_closure_code, find_repair_notes, parse_date_reply, strip_emphasis};
use crate::prompt::PromptBuilder;
use crate::types::{DateField, Extraction, ExtractionWarning, GenerationStage};
use fieldaudit_domain::datetime;
use fieldaudit_domain::traits::TextGenerator;
use fieldaudit_domain::{ExtractedFields, Timestamp};
use std::fmt::Display;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The FieldExtractor turns document text into audit fields
///
/// Two generation calls are made per document: one for the engineer arrival
/// and activity end times, one for the audit summary. Repair notes and the
/// closure code are read straight from the document text.
pub struct FieldExtractor<G> {
    generator: Arc<G>,
    config: ExtractorConfig,
}

impl<G> FieldExtractor<G>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    /// Create a new FieldExtractor
    pub fn new(generator: G, config: ExtractorConfig) -> Self {
        Self::from_shared(Arc::new(generator), config)
    }

    /// Create a FieldExtractor over a generator that is shared elsewhere
    pub fn from_shared(generator: Arc<G>, config: ExtractorConfig) -> Self {
        Self { generator, config }
    }

    /// The extractor's configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract fields and a summary from document text
    ///
    /// Only an over-long document is an error. Generation failures, empty
    /// replies and unparseable dates are reported as warnings and leave the
    /// affected fields absent.
    pub async fn extract(&self, text: &str) -> Result<Extraction, ExtractorError> {
        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(length, self.config.max_text_length));
        }

        info!("Starting extraction, text length {}", length);

        let prompts = PromptBuilder::new(text);
        let mut warnings = Vec::new();

        let date_reply = self
            .reply(GenerationStage::Dates, prompts.dates(), &mut warnings)
            .await;

        let (engineer_arrival, activity_end) = match date_reply {
            Some(reply) => {
                let hints = parse_date_reply(&reply);
                debug!(
                    "Date reply hints: arrival={:?}, end={:?}",
                    hints.engineer_arrival, hints.activity_end
                );
                (
                    resolve(DateField::EngineerArrival, hints.engineer_arrival, &mut warnings),
                    resolve(DateField::ActivityEnd, hints.activity_end, &mut warnings),
                )
            }
            None => (None, None),
        };

        let summary = self
            .reply(GenerationStage::Summary, prompts.summary(), &mut warnings)
            .await
            .map(|reply| strip_emphasis(&reply))
            .unwrap_or_default();

        let fields = ExtractedFields {
            engineer_arrival,
            activity_end,
            repair_notes: find_repair_notes(text),
            closure_code: find_closure_code(text),
        };

        info!(
            "Extraction complete: arrival={}, end={}, notes={}, code={}, {} warnings",
            fields.engineer_arrival.is_some(),
            fields.activity_end.is_some(),
            fields.repair_notes.is_some(),
            fields.closure_code.is_some(),
            warnings.len()
        );

        Ok(Extraction {
            summary,
            fields,
            warnings,
        })
    }

    /// Run one generation call, turning every failure into a warning
    async fn reply(
        &self,
        stage: GenerationStage,
        prompt: String,
        warnings: &mut Vec<ExtractionWarning>,
    ) -> Option<String> {
        debug!("Prompt length for {}: {} chars", stage, prompt.len());

        match self.generate(prompt).await {
            Ok(reply) if reply.trim().is_empty() => {
                warn!("Empty {} reply", stage);
                warnings.push(ExtractionWarning::EmptyReply { stage });
                None
            }
            Ok(reply) => {
                debug!("{} reply length: {} chars", stage, reply.len());
                Some(reply)
            }
            Err(e) => {
                warn!("{} generation failed: {}", stage, e);
                warnings.push(ExtractionWarning::Generation {
                    stage,
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    /// Call the generator on the blocking pool, bounded by the configured timeout
    async fn generate(&self, prompt: String) -> Result<String, ExtractorError> {
        let generator = Arc::clone(&self.generator);

        // The generator blocks on network I/O
        let task = tokio::task::spawn_blocking(move || {
            generator
                .generate(&prompt)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        });

        timeout(self.config.generation_timeout(), task)
            .await
            .map_err(|_| ExtractorError::Timeout(self.config.generation_timeout_secs))?
            .map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
    }
}

fn resolve(
    field: DateField,
    token: Option<String>,
    warnings: &mut Vec<ExtractionWarning>,
) -> Option<Timestamp> {
    let raw = token?;
    match datetime::parse_known(&raw) {
        Some((value, _)) => Some(value),
        None => {
            warn!("Discarding unparseable {} '{}'", field, raw);
            warnings.push(ExtractionWarning::UnparseableTimestamp { field, raw });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fieldaudit_llm::MockGenerator;

    fn at(hour: u32, minute: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 10, 7)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_resolve_parses_canonical_token() {
        let mut warnings = Vec::new();
        let value = resolve(
            DateField::EngineerArrival,
            Some("07-Oct-2024, 11:00 AM".to_string()),
            &mut warnings,
        );
        assert_eq!(value, Some(at(11, 0)));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_resolve_rejects_impossible_date() {
        let mut warnings = Vec::new();
        let value = resolve(
            DateField::ActivityEnd,
            Some("31-Feb-2024, 10:00 AM".to_string()),
            &mut warnings,
        );
        assert_eq!(value, None);
        assert_eq!(
            warnings,
            vec![ExtractionWarning::UnparseableTimestamp {
                field: DateField::ActivityEnd,
                raw: "31-Feb-2024, 10:00 AM".to_string(),
            }]
        );
    }

    #[test]
    fn test_resolve_absent_token() {
        let mut warnings = Vec::new();
        assert_eq!(resolve(DateField::ActivityEnd, None, &mut warnings), None);
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn test_text_too_long() {
        let config = ExtractorConfig {
            max_text_length: 10,
            ..Default::default()
        };
        let generator = MockGenerator::default();
        let extractor = FieldExtractor::from_shared(Arc::new(generator.clone()), config);

        let result = extractor.extract("this text is longer than ten characters").await;

        assert!(matches!(result, Err(ExtractorError::TextTooLong(_, 10))));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_length_counts_characters() {
        let config = ExtractorConfig {
            max_text_length: 4,
            ..Default::default()
        };
        let extractor = FieldExtractor::new(MockGenerator::new(""), config);

        // four characters, more than four bytes
        assert!(extractor.extract("été!").await.is_ok());
    }
}
