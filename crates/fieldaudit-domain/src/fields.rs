//! Fields pulled out of a completion report

use crate::datetime::Timestamp;
use serde::{Deserialize, Serialize};

/// The values the extractor found in one document
///
/// Every field is optional. A missing field is an expected outcome that the
/// audit rules account for, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// When the engineer arrived on site
    pub engineer_arrival: Option<Timestamp>,

    /// When the activity was closed out
    pub activity_end: Option<Timestamp>,

    /// Free-text repair notes as written on the report
    pub repair_notes: Option<String>,

    /// Closure code as written on the report
    pub closure_code: Option<String>,
}

impl ExtractedFields {
    /// Whether nothing at all was extracted
    pub fn is_empty(&self) -> bool {
        self.engineer_arrival.is_none()
            && self.activity_end.is_none()
            && self.repair_notes.is_none()
            && self.closure_code.is_none()
    }
}
