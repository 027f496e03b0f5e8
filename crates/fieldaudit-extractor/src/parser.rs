//! Best-effort field matching over untrusted text
//!
//! Everything here always succeeds: a pattern that finds nothing yields
//! `None`. The date matchers run over a model reply; the repair matchers run
//! over the raw document text.

use regex::Regex;
use std::sync::LazyLock;

static ENGINEER_ARRIVAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Engineer\s*arrival\s*(?:Date\s*and\s*Time|Dt/time)[:\s*]*\**\s*(\d{2}-\w{3}-\d{4},\s*\d{2}:\d{2}\s*(?:AM|PM))",
    )
    .expect("engineer arrival pattern is valid")
});

static ACTIVITY_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Activity\s*End\s*Dt/time[:\s*]*\**\s*(\d{2}-\w{3}-\d{4},\s*\d{2}:\d{2}\s*(?:AM|PM))")
        .expect("activity end pattern is valid")
});

static REPAIR_NOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Repair Notes[ \t]*:[ \t]*(.+)").expect("repair notes pattern is valid"));

static CLOSURE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Closure Code[ \t]*:[ \t]*(.+)").expect("closure code pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Date tokens found in a model reply, still unparsed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateHints {
    /// Token following an engineer arrival label
    pub engineer_arrival: Option<String>,
    /// Token following an activity end label
    pub activity_end: Option<String>,
}

/// Collapse every whitespace run to one space and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Remove `*` emphasis markup and trim
pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', "").trim().to_string()
}

/// Scan a date-extraction reply for the two labelled date tokens
pub fn parse_date_reply(reply: &str) -> DateHints {
    let cleaned = collapse_whitespace(reply);
    DateHints {
        engineer_arrival: first_capture(&ENGINEER_ARRIVAL, &cleaned),
        activity_end: first_capture(&ACTIVITY_END, &cleaned),
    }
}

/// `Repair Notes: <value>` from the document text
pub fn find_repair_notes(document_text: &str) -> Option<String> {
    first_capture(&REPAIR_NOTES, document_text)
}

/// `Closure Code: <value>` from the document text
pub fn find_closure_code(document_text: &str) -> Option<String> {
    first_capture(&CLOSURE_CODE, document_text)
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}
