//! Date/time parsing for the loosely formatted strings found in completion reports
//!
//! Reports and model replies write times in a handful of shapes. [`parse`]
//! tries each known [`DateFormat`] in priority order and stops at the first
//! that succeeds. When none match it substitutes the current time, but marks
//! the result as [`ParsedTimestamp::Fallback`] so a substituted value can never
//! be mistaken for one read from the document.

use chrono::{Local, NaiveDateTime};
use std::fmt;
use tracing::warn;

/// A naive local point in time (no timezone), as written on the report
pub type Timestamp = NaiveDateTime;

/// A date/time layout understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `07-Oct-2024, 11:00 AM` (the canonical layout)
    Canonical,
    /// `07-Oct-2024, 14:00`
    DayMonth24h,
    /// `07-Oct-2024, 14:00 PM`; the trailing marker is ignored
    DayMonth24hWithMarker,
    /// `2024-10-07T14:00:00`
    Iso8601,
    /// `07/10/2024 14:00`
    DaySlash24h,
}

impl DateFormat {
    /// Formats tried by [`parse`], highest priority first
    pub const PRIORITY: [DateFormat; 5] = [
        DateFormat::Canonical,
        DateFormat::DayMonth24h,
        DateFormat::DayMonth24hWithMarker,
        DateFormat::Iso8601,
        DateFormat::DaySlash24h,
    ];

    /// The chrono pattern for this layout
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Canonical => "%d-%b-%Y, %I:%M %p",
            DateFormat::DayMonth24h => "%d-%b-%Y, %H:%M",
            DateFormat::DayMonth24hWithMarker => "%d-%b-%Y, %H:%M %p",
            DateFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S",
            DateFormat::DaySlash24h => "%d/%m/%Y %H:%M",
        }
    }

    /// Parse `text` in exactly this layout
    pub fn parse(self, text: &str) -> Option<Timestamp> {
        let text = text.trim();
        match self {
            // chrono rejects an AM/PM marker that disagrees with a 24-hour
            // value, so drop the marker and read the hour as written.
            DateFormat::DayMonth24hWithMarker => {
                let without_marker = strip_meridiem(text)?;
                NaiveDateTime::parse_from_str(without_marker, DateFormat::DayMonth24h.pattern())
                    .ok()
            }
            _ => NaiveDateTime::parse_from_str(text, self.pattern()).ok(),
        }
    }

    /// Render `timestamp` in this layout
    pub fn format(self, timestamp: &Timestamp) -> String {
        timestamp.format(self.pattern()).to_string()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

/// Result of the permissive parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// The text matched a known layout
    Parsed {
        /// The parsed value
        value: Timestamp,
        /// The layout that matched
        format: DateFormat,
    },
    /// No layout matched; this is the time the parse was attempted
    Fallback(Timestamp),
}

impl ParsedTimestamp {
    /// The parsed value, or `None` if the fallback was used
    pub fn parsed(self) -> Option<Timestamp> {
        match self {
            ParsedTimestamp::Parsed { value, .. } => Some(value),
            ParsedTimestamp::Fallback(_) => None,
        }
    }

    /// The value regardless of where it came from
    pub fn value(self) -> Timestamp {
        match self {
            ParsedTimestamp::Parsed { value, .. } => value,
            ParsedTimestamp::Fallback(value) => value,
        }
    }

    /// Whether the current time was substituted
    pub fn is_fallback(self) -> bool {
        matches!(self, ParsedTimestamp::Fallback(_))
    }
}

/// Parse `text` in one specific layout
///
/// # Examples
///
/// ```
/// use fieldaudit_domain::datetime::{parse_strict, DateFormat};
///
/// let ts = parse_strict("07-Oct-2024, 11:00 AM", DateFormat::Canonical).unwrap();
/// assert_eq!(ts.to_string(), "2024-10-07 11:00:00");
/// assert!(parse_strict("07-Oct-2024, 14:00", DateFormat::Canonical).is_none());
/// ```
pub fn parse_strict(text: &str, format: DateFormat) -> Option<Timestamp> {
    format.parse(text)
}

/// Try every known layout in priority order, without any fallback
pub fn parse_known(text: &str) -> Option<(Timestamp, DateFormat)> {
    DateFormat::PRIORITY
        .iter()
        .find_map(|format| format.parse(text).map(|value| (value, *format)))
}

/// Parse `text` permissively, substituting the current local time on failure
pub fn parse(text: &str) -> ParsedTimestamp {
    parse_with_fallback(text, || Local::now().naive_local())
}

/// Like [`parse`], with the fallback clock supplied by the caller
pub fn parse_with_fallback<F>(text: &str, now: F) -> ParsedTimestamp
where
    F: FnOnce() -> Timestamp,
{
    match parse_known(text) {
        Some((value, format)) => ParsedTimestamp::Parsed { value, format },
        None => {
            let value = now();
            warn!("Unable to parse date '{}', falling back to {}", text.trim(), value);
            ParsedTimestamp::Fallback(value)
        }
    }
}

/// Render a timestamp in the canonical report layout
pub fn format_canonical(timestamp: &Timestamp) -> String {
    DateFormat::Canonical.format(timestamp)
}

/// Strip a trailing `AM`/`PM` (any case) from `text`
fn strip_meridiem(text: &str) -> Option<&str> {
    let split = text.len().checked_sub(2)?;
    if !text.is_char_boundary(split) {
        return None;
    }
    let (head, marker) = text.split_at(split);
    if marker.eq_ignore_ascii_case("am") || marker.eq_ignore_ascii_case("pm") {
        Some(head.trim_end())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_canonical_format() {
        let parsed = parse_strict("07-Oct-2024, 11:00 AM", DateFormat::Canonical);
        assert_eq!(parsed, Some(ts(2024, 10, 7, 11, 0)));

        let parsed = parse_strict("07-Oct-2024, 11:00 PM", DateFormat::Canonical);
        assert_eq!(parsed, Some(ts(2024, 10, 7, 23, 0)));
    }

    #[test]
    fn test_canonical_is_case_insensitive() {
        let parsed = parse_strict("07-oct-2024, 09:15 pm", DateFormat::Canonical);
        assert_eq!(parsed, Some(ts(2024, 10, 7, 21, 15)));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let parsed = parse_strict("  07-Oct-2024, 11:00 AM \n", DateFormat::Canonical);
        assert_eq!(parsed, Some(ts(2024, 10, 7, 11, 0)));
    }

    #[test]
    fn test_24_hour_format() {
        let result = parse("07-Oct-2024, 14:30");
        assert_eq!(
            result,
            ParsedTimestamp::Parsed {
                value: ts(2024, 10, 7, 14, 30),
                format: DateFormat::DayMonth24h,
            }
        );
    }

    #[test]
    fn test_24_hour_with_contradicting_marker() {
        let result = parse("07-Oct-2024, 14:30 AM");
        assert_eq!(
            result,
            ParsedTimestamp::Parsed {
                value: ts(2024, 10, 7, 14, 30),
                format: DateFormat::DayMonth24hWithMarker,
            }
        );
    }

    #[test]
    fn test_iso_and_slash_formats() {
        assert_eq!(parse("2024-10-07T08:05:00").parsed(), Some(ts(2024, 10, 7, 8, 5)));
        assert_eq!(parse("07/10/2024 08:05").parsed(), Some(ts(2024, 10, 7, 8, 5)));
    }

    #[test]
    fn test_priority_prefers_canonical() {
        // Also valid as "24-hour with ignored marker" (11:00), but the
        // canonical reading (23:00) must win.
        match parse("07-Oct-2024, 11:00 PM") {
            ParsedTimestamp::Parsed { value, format } => {
                assert_eq!(value, ts(2024, 10, 7, 23, 0));
                assert_eq!(format, DateFormat::Canonical);
            }
            other => panic!("Expected a parsed timestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_fallback_is_observable() {
        let clock = ts(2030, 1, 1, 0, 0);
        let result = parse_with_fallback("next tuesday-ish", || clock);
        assert!(result.is_fallback());
        assert_eq!(result.parsed(), None);
        assert_eq!(result.value(), clock);
    }

    #[test]
    fn test_fallback_not_used_on_success() {
        let result = parse_with_fallback("07-Oct-2024, 11:00 AM", || panic!("clock read"));
        assert!(!result.is_fallback());
    }

    #[test]
    fn test_empty_input_falls_back() {
        assert!(parse("").is_fallback());
        assert!(parse_known("   ").is_none());
    }

    #[test]
    fn test_strip_meridiem() {
        assert_eq!(strip_meridiem("14:00 PM"), Some("14:00"));
        assert_eq!(strip_meridiem("14:00pm"), Some("14:00"));
        assert_eq!(strip_meridiem("14:00"), None);
        assert_eq!(strip_meridiem("M"), None);
    }

    #[test]
    fn test_format_canonical() {
        assert_eq!(format_canonical(&ts(2024, 10, 7, 11, 0)), "07-Oct-2024, 11:00 AM");
        assert_eq!(format_canonical(&ts(2024, 10, 7, 0, 5)), "07-Oct-2024, 12:05 AM");
    }

    fn timestamp_strategy() -> impl Strategy<Value = Timestamp> {
        (1970i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60)
            .prop_map(|(y, m, d, h, min)| ts(y, m, d, h, min))
    }

    proptest! {
        #[test]
        fn prop_every_format_round_trips(value in timestamp_strategy()) {
            for format in DateFormat::PRIORITY {
                let rendered = format.format(&value);
                prop_assert_eq!(parse_strict(&rendered, format), Some(value), "format {:?}", format);
            }
        }

        #[test]
        fn prop_canonical_round_trips_through_parse(value in timestamp_strategy()) {
            let rendered = format_canonical(&value);
            prop_assert_eq!(parse(&rendered).parsed(), Some(value));
        }
    }
}
