//! Audit rules for completion reports
//!
//! Two independent checks feed the report:
//!
//! - the appointment audit ([`evaluate`]) scores how the activity end time
//!   relates to the engineer's arrival, with a 20 minute threshold
//! - the repair audit ([`audit_repair`]) checks that repair notes exist and
//!   that the closure code appears in them
//!
//! Both are pure functions of their inputs. The logged date is supplied by the
//! caller; nothing here reads the clock.

use crate::datetime::Timestamp;
use crate::fields::ExtractedFields;
use chrono::Duration;
use serde::{Serialize, Serializer};
use tracing::debug;

/// Delay after arrival, in minutes, inside which an activity end is flagged
pub const TIMELINESS_GRACE_MINUTES: i64 = 20;

/// Service-provider timeliness result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeliness {
    /// Scored 1
    Compliant,
    /// Scored 0: the activity ended within the threshold after arrival
    Delayed,
    /// Arrival or activity end could not be determined
    DataMissing,
}

impl Timeliness {
    /// The numeric score, if there is one
    pub fn score(self) -> Option<u8> {
        match self {
            Timeliness::Compliant => Some(1),
            Timeliness::Delayed => Some(0),
            Timeliness::DataMissing => None,
        }
    }
}

impl Serialize for Timeliness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.score() {
            Some(score) => serializer.serialize_u8(score),
            None => serializer.serialize_str("DataMissing"),
        }
    }
}

/// Result of the appointment audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppointmentAudit {
    /// Whether a logged date was available
    pub logged_date_present: bool,

    /// Whether an engineer arrival time was available
    pub engineer_arrival_present: bool,

    /// Timeliness score
    pub service_provider_timeliness: Timeliness,
}

/// Evaluate the appointment audit
///
/// Rules, first match wins:
///
/// 1. arrival or end missing: `DataMissing`, presence flags as observed
/// 2. end at or before arrival: compliant
/// 3. end within [`TIMELINESS_GRACE_MINUTES`] of arrival (inclusive): delayed
/// 4. otherwise: compliant
///
/// Rules 2 and 4 score the same although the delays point in opposite
/// directions. Existing audit reports depend on this scoring, so it is kept
/// as is until the rule owner says otherwise.
///
/// Once both times are present the presence flags are reported as 1, whether
/// or not a logged date was supplied.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use fieldaudit_domain::{evaluate, Timeliness};
///
/// let arrival = NaiveDate::from_ymd_opt(2024, 10, 7).unwrap().and_hms_opt(11, 0, 0).unwrap();
/// let audit = evaluate(Some(arrival), Some(arrival), Some(arrival + Duration::minutes(10)));
/// assert_eq!(audit.service_provider_timeliness, Timeliness::Delayed);
/// ```
pub fn evaluate(
    logged_date: Option<Timestamp>,
    engineer_arrival: Option<Timestamp>,
    activity_end: Option<Timestamp>,
) -> AppointmentAudit {
    let (arrival, end) = match (engineer_arrival, activity_end) {
        (Some(arrival), Some(end)) => (arrival, end),
        _ => {
            debug!("Arrival or activity end missing, timeliness cannot be scored");
            return AppointmentAudit {
                logged_date_present: logged_date.is_some(),
                engineer_arrival_present: engineer_arrival.is_some(),
                service_provider_timeliness: Timeliness::DataMissing,
            };
        }
    };

    let elapsed = end - arrival;
    let timeliness = if end <= arrival {
        debug!("Activity ended at or before arrival ({}s)", elapsed.num_seconds());
        Timeliness::Compliant
    } else if end <= arrival + Duration::minutes(TIMELINESS_GRACE_MINUTES) {
        debug!("Activity ended within the threshold ({}s)", elapsed.num_seconds());
        Timeliness::Delayed
    } else {
        debug!("Activity ended after the threshold ({}s)", elapsed.num_seconds());
        Timeliness::Compliant
    };

    AppointmentAudit {
        logged_date_present: true,
        engineer_arrival_present: true,
        service_provider_timeliness: timeliness,
    }
}

/// Result of the repair audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepairAudit {
    /// Whether repair notes were found
    pub repair_notes_present: bool,

    /// Whether the closure code appears (case-insensitively) in the notes
    pub closure_matches_repair: bool,
}

/// Evaluate the repair audit
///
/// A missing closure code or missing notes never counts as a match.
pub fn audit_repair(repair_notes: Option<&str>, closure_code: Option<&str>) -> RepairAudit {
    let closure_matches_repair = match (repair_notes, closure_code) {
        (Some(notes), Some(code)) => notes.to_lowercase().contains(&code.to_lowercase()),
        _ => false,
    };

    RepairAudit {
        repair_notes_present: repair_notes.is_some(),
        closure_matches_repair,
    }
}

/// Every audit result for one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditOutcome {
    /// Whether a logged date was available
    pub logged_date_present: bool,

    /// Whether an engineer arrival time was available
    pub engineer_arrival_present: bool,

    /// Timeliness score
    pub service_provider_timeliness: Timeliness,

    /// Whether repair notes were found
    pub repair_notes_present: bool,

    /// Whether the closure code appears in the repair notes
    pub closure_matches_repair: bool,
}

impl AuditOutcome {
    /// Combine the two audits
    pub fn from_parts(appointment: AppointmentAudit, repair: RepairAudit) -> Self {
        Self {
            logged_date_present: appointment.logged_date_present,
            engineer_arrival_present: appointment.engineer_arrival_present,
            service_provider_timeliness: appointment.service_provider_timeliness,
            repair_notes_present: repair.repair_notes_present,
            closure_matches_repair: repair.closure_matches_repair,
        }
    }

    /// Run both audits over the extracted fields
    pub fn assess(logged_date: Option<Timestamp>, fields: &ExtractedFields) -> Self {
        let appointment = evaluate(logged_date, fields.engineer_arrival, fields.activity_end);
        let repair = audit_repair(fields.repair_notes.as_deref(), fields.closure_code.as_deref());
        Self::from_parts(appointment, repair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn arrival() -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 10, 7)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap()
    }

    fn timeliness_for(end: Timestamp) -> Timeliness {
        evaluate(Some(arrival()), Some(arrival()), Some(end)).service_provider_timeliness
    }

    #[test]
    fn test_end_equal_to_arrival_is_compliant() {
        assert_eq!(timeliness_for(arrival()), Timeliness::Compliant);
    }

    #[test]
    fn test_end_before_arrival_is_compliant() {
        assert_eq!(timeliness_for(arrival() - Duration::hours(2)), Timeliness::Compliant);
    }

    #[test]
    fn test_end_inside_threshold_is_delayed() {
        assert_eq!(timeliness_for(arrival() + Duration::seconds(1)), Timeliness::Delayed);
        assert_eq!(timeliness_for(arrival() + Duration::minutes(5)), Timeliness::Delayed);
    }

    #[test]
    fn test_threshold_itself_is_delayed() {
        assert_eq!(timeliness_for(arrival() + Duration::minutes(20)), Timeliness::Delayed);
    }

    #[test]
    fn test_past_threshold_scores_compliant() {
        let end = arrival() + Duration::minutes(20) + Duration::seconds(1);
        assert_eq!(timeliness_for(end), Timeliness::Compliant);
        assert_eq!(timeliness_for(arrival() + Duration::hours(3)), Timeliness::Compliant);
    }

    #[test]
    fn test_missing_arrival() {
        let audit = evaluate(Some(arrival()), None, Some(arrival()));
        assert_eq!(
            audit,
            AppointmentAudit {
                logged_date_present: true,
                engineer_arrival_present: false,
                service_provider_timeliness: Timeliness::DataMissing,
            }
        );
    }

    #[test]
    fn test_missing_end_keeps_arrival_flag() {
        let audit = evaluate(None, Some(arrival()), None);
        assert!(!audit.logged_date_present);
        assert!(audit.engineer_arrival_present);
        assert_eq!(audit.service_provider_timeliness, Timeliness::DataMissing);
    }

    #[test]
    fn test_complete_times_set_both_flags() {
        let audit = evaluate(None, Some(arrival()), Some(arrival()));
        assert!(audit.logged_date_present);
        assert!(audit.engineer_arrival_present);
    }

    #[test]
    fn test_repair_audit_match() {
        let audit = audit_repair(Some("replaced fan motor"), Some("REPLACED"));
        assert!(audit.repair_notes_present);
        assert!(audit.closure_matches_repair);
    }

    #[test]
    fn test_repair_audit_mismatch() {
        let audit = audit_repair(Some("replaced fan motor"), Some("UNRELATED"));
        assert!(audit.repair_notes_present);
        assert!(!audit.closure_matches_repair);
    }

    #[test]
    fn test_repair_audit_absent_values() {
        assert_eq!(
            audit_repair(None, None),
            RepairAudit { repair_notes_present: false, closure_matches_repair: false }
        );
        assert!(!audit_repair(Some("notes"), None).closure_matches_repair);
        assert!(!audit_repair(None, Some("code")).closure_matches_repair);
    }

    #[test]
    fn test_assess_combines_both_audits() {
        let fields = ExtractedFields {
            engineer_arrival: Some(arrival()),
            activity_end: Some(arrival() + Duration::minutes(45)),
            repair_notes: Some("Replaced fan motor".to_string()),
            closure_code: Some("fan motor".to_string()),
        };
        let outcome = AuditOutcome::assess(Some(arrival()), &fields);
        assert_eq!(outcome.service_provider_timeliness, Timeliness::Compliant);
        assert!(outcome.repair_notes_present);
        assert!(outcome.closure_matches_repair);
    }

    #[test]
    fn test_timeliness_serialization() {
        assert_eq!(serde_json::to_string(&Timeliness::Compliant).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Timeliness::Delayed).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Timeliness::DataMissing).unwrap(), "\"DataMissing\"");
    }
}
