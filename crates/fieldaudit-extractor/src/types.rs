//! Types for extraction requests and audit records

use crate::error::PipelineError;
use fieldaudit_domain::{report_rows, AuditOutcome, ExtractedFields, ReportRow, Timestamp};
use serde::Serialize;
use std::fmt;

/// Which external call a warning came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    /// Engineer arrival / activity end extraction
    Dates,
    /// Human-readable audit summary
    Summary,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStage::Dates => f.write_str("dates"),
            GenerationStage::Summary => f.write_str("summary"),
        }
    }
}

/// Which timestamp field a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    /// Engineer arrival
    EngineerArrival,
    /// Activity end
    ActivityEnd,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::EngineerArrival => f.write_str("engineer arrival"),
            DateField::ActivityEnd => f.write_str("activity end"),
        }
    }
}

/// A recoverable problem met while extracting one document
///
/// Warnings never stop extraction. The fields that depended on the failing
/// step are left absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionWarning {
    /// An external call failed or timed out
    Generation {
        /// The call that failed
        stage: GenerationStage,
        /// Error message
        reason: String,
    },

    /// An external call returned nothing but whitespace
    EmptyReply {
        /// The call that came back empty
        stage: GenerationStage,
    },

    /// A date token was found but no known layout accepted it
    UnparseableTimestamp {
        /// The field the token was meant for
        field: DateField,
        /// The token as found
        raw: String,
    },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::Generation { stage, reason } => {
                write!(f, "{} generation failed: {}", stage, reason)
            }
            ExtractionWarning::EmptyReply { stage } => write!(f, "{} generation returned nothing", stage),
            ExtractionWarning::UnparseableTimestamp { field, raw } => {
                write!(f, "could not parse {} '{}'", field, raw)
            }
        }
    }
}

/// Output of the field extractor for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Human-readable audit summary, empty if it could not be generated
    pub summary: String,

    /// Fields found in the document and the date reply
    pub fields: ExtractedFields,

    /// Problems met along the way
    pub warnings: Vec<ExtractionWarning>,
}

/// A document to audit
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// File name as uploaded; normalized into the cache key
    pub file_name: String,

    /// Raw document bytes
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    /// Create a new document input
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// The audit record for one document
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// File name as uploaded
    pub file_name: String,

    /// Cache key derived from the file name
    pub key: String,

    /// Whether the document text came from the cache
    pub cache_hit: bool,

    /// Logged date the audit was run against
    pub logged_date: Option<Timestamp>,

    /// Extracted fields
    pub fields: ExtractedFields,

    /// Audit results
    pub outcome: AuditOutcome,

    /// Human-readable audit summary
    pub summary: String,

    /// Recoverable problems met during extraction
    pub warnings: Vec<ExtractionWarning>,
}

impl AuditRecord {
    /// Report rows for this record, one per audit parameter
    pub fn rows(&self) -> Vec<ReportRow> {
        report_rows(&self.outcome)
    }
}

/// Result of auditing one document in a batch
#[derive(Debug)]
pub struct DocumentReport {
    /// File name as uploaded
    pub file_name: String,

    /// The record, or why this document failed
    pub result: Result<AuditRecord, PipelineError>,
}

impl DocumentReport {
    /// Whether the document was audited
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
