//! Fieldaudit Extractor
//!
//! Turns field-service completion report text into audit fields and runs
//! documents through the audit pipeline.
//!
//! # Overview
//!
//! The text-generation service is treated as an unreliable hint source. Its
//! replies are matched against fixed patterns; anything that does not match
//! leaves the field absent and the audit scores it as missing data.
//!
//! # Architecture
//!
//! ```text
//! File name → NormalizedKey → ExtractionCache → FieldExtractor → LLM
//!                                                    ↓
//!                                   AuditOutcome → AuditRecord
//! ```
//!
//! # Key Features
//!
//! - **Date extraction**: engineer arrival and activity end from an LLM reply
//! - **Repair fields**: repair notes and closure code read straight from the text
//! - **Audit summary**: a human-readable summary, emphasis stripped
//! - **Warnings, not failures**: generation errors, timeouts and unparseable
//!   dates degrade the record instead of failing it
//! - **Batch isolation**: one failing document never stops the others
//!
//! # Example Usage
//!
//! ```no_run
//! use fieldaudit_extractor::{AuditPipeline, DocumentInput, ExtractorConfig, FieldExtractor};
//! use fieldaudit_domain::traits::DocumentReader;
//! use fieldaudit_llm::MockGenerator;
//! use fieldaudit_store::{ExtractionCache, SqliteStore};
//!
//! struct PlainText;
//!
//! impl DocumentReader for PlainText {
//!     type Error = std::string::FromUtf8Error;
//!
//!     fn read_text(&self, bytes: &[u8]) -> Result<String, Self::Error> {
//!         String::from_utf8(bytes.to_vec())
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = FieldExtractor::new(MockGenerator::default(), ExtractorConfig::default());
//! let cache = ExtractionCache::new(SqliteStore::new("cache.db")?);
//! let pipeline = AuditPipeline::new(extractor, cache, PlainText);
//!
//! let input = DocumentInput::new("job-118.txt", "Repair Notes: replaced fan motor");
//! let record = pipeline.audit_document(input, None).await?;
//!
//! for row in record.rows() {
//!     println!("{}: {}", row.parameter, row.result);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
pub mod parser;
mod pipeline;
mod prompt;
mod types;


pub use config::ExtractorConfig;
pub use error::{ExtractorError, PipelineError};
pub use extractor::FieldExtractor;
pub use pipeline::AuditPipeline;
pub use prompt::PromptBuilder;
pub use types::{
    AuditRecord, DateField, DocumentInput, DocumentReport, Extraction, ExtractionWarning,
    GenerationStage,
};
