//! Fieldaudit Domain Layer
//!
//! This crate holds the audit rules and value types for checking field-service
//! completion reports. It performs no I/O: everything that talks to a model,
//! a disk or a PDF lives behind the traits in [`traits`] and is implemented
//! in other crates.
//!
//! ## Key Concepts
//!
//! - **Normalized key**: lower-cased, punctuation-stripped file name used to
//!   address cached document text
//! - **Timestamp**: naive local date and time, produced only by [`datetime`]
//! - **Extracted fields**: the four optional values pulled from a report
//! - **Audit outcome**: the binary/categorical results written to the report
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod datetime;
pub mod fields;
pub mod normalize;
pub mod report;
pub mod traits;

// Re-exports for convenience
pub use audit::{
    audit_repair, evaluate, AppointmentAudit, AuditOutcome, RepairAudit, Timeliness,
    TIMELINESS_GRACE_MINUTES,
};
pub use datetime::{DateFormat, ParsedTimestamp, Timestamp};
pub use fields::ExtractedFields;
pub use normalize::{normalize, NormalizedKey};
pub use report::{report_rows, ReportRow, ReportValue};
