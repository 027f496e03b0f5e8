//! LLM prompts for date extraction and the audit summary

/// Builds the two prompts sent for each document
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder over the document text
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Prompt asking for the engineer arrival and activity end date/times
    pub fn dates(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(DATE_INSTRUCTIONS);
        prompt.push_str("\n\nReport text:\n---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");
        prompt.push_str(DATE_FORMAT_REMINDER);
        prompt
    }

    /// Prompt asking for a human-readable audit summary
    pub fn summary(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(SUMMARY_INSTRUCTIONS);
        prompt.push_str("\n\nReport text:\n---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n");
        prompt
    }
}

pub(crate) const DATE_INSTRUCTIONS: &str = "List the engineer arrival and activity end date/times \
found in the field-service completion report below.";

const DATE_FORMAT_REMINDER: &str = r#"Answer with exactly these two lines, using the date/time as written in the report:
Engineer arrival Dt/time: DD-Mon-YYYY, HH:MM AM/PM
Activity End Dt/time: DD-Mon-YYYY, HH:MM AM/PM

Example: Engineer arrival Dt/time: 07-Oct-2024, 11:00 AM
Leave a line out if the report does not contain that value."#;

pub(crate) const SUMMARY_INSTRUCTIONS: &str = r#"Write an audit summary of the field-service completion report below.
Cover each of these audit parameters under its own heading:

Repair Notes: the repair details recorded on the report, quoted verbatim when present.

Closure Code and Repair Validation: the closure code, if any, and whether it is consistent with the repair notes. Say plainly when they do not match.

Logged Date: the date the call or repair was logged. Note any ambiguity.

Engineer Arrival: when the engineer arrived on site, in the form 07-Oct-2024, 11:00 AM.

Service Provider Timing: compare the expected start of work with the Activity End date and time and comment on promptness.

Additional Findings: any scheduling problems, delays or missing information worth flagging."#;
