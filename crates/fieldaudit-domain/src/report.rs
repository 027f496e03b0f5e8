//! Report rows: one audit parameter per row with a 1/0/"Data Missing" result

use crate::audit::{AuditOutcome, Timeliness};
use serde::Serialize;
use std::fmt;

/// Header of the parameter column
pub const PARAMETER_COLUMN: &str = "Audit Parameter";

/// Header of the result column
pub const RESULT_COLUMN: &str = "Result (Yes=1/No=0)";

/// A single cell in the result column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportValue {
    /// Rendered as `1`
    Yes,
    /// Rendered as `0`
    No,
    /// Rendered as `Data Missing`
    DataMissing,
}

impl From<bool> for ReportValue {
    fn from(value: bool) -> Self {
        if value {
            ReportValue::Yes
        } else {
            ReportValue::No
        }
    }
}

impl From<Timeliness> for ReportValue {
    fn from(value: Timeliness) -> Self {
        match value {
            Timeliness::Compliant => ReportValue::Yes,
            Timeliness::Delayed => ReportValue::No,
            Timeliness::DataMissing => ReportValue::DataMissing,
        }
    }
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Yes => f.write_str("1"),
            ReportValue::No => f.write_str("0"),
            ReportValue::DataMissing => f.write_str("Data Missing"),
        }
    }
}

/// One row of an audit report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Audit parameter name
    pub parameter: &'static str,
    /// Result for this document
    pub result: ReportValue,
}

/// Lay an outcome out as report rows, in the order reports have always used
pub fn report_rows(outcome: &AuditOutcome) -> Vec<ReportRow> {
    vec![
        ReportRow {
            parameter: "Repair_notes",
            result: outcome.repair_notes_present.into(),
        },
        ReportRow {
            parameter: "Closure match Repair Validation",
            result: outcome.closure_matches_repair.into(),
        },
        ReportRow {
            parameter: "Logged Date",
            result: outcome.logged_date_present.into(),
        },
        ReportRow {
            parameter: "Engineer Arrival",
            result: outcome.engineer_arrival_present.into(),
        },
        ReportRow {
            parameter: "service provider stimulated Dt",
            result: outcome.service_provider_timeliness.into(),
        },
    ]
}
