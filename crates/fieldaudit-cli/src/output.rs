//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use fieldaudit_domain::ReportValue;
use fieldaudit_extractor::{AuditRecord, DocumentReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format batch results.
    pub fn format_reports(&self, reports: &[DocumentReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&reports_json(reports)?)?),
            OutputFormat::Table => Ok(self.format_reports_table(reports)),
            OutputFormat::Quiet => Ok(format_reports_quiet(reports)),
        }
    }

    /// Format batch results as a table, failures listed underneath.
    fn format_reports_table(&self, reports: &[DocumentReport]) -> String {
        if reports.is_empty() {
            return self.colorize("No documents audited.", "yellow");
        }

        let records: Vec<&AuditRecord> = reports.iter().filter_map(|r| r.result.as_ref().ok()).collect();
        let mut sections = Vec::new();

        if !records.is_empty() {
            let mut builder = Builder::default();
            builder.push_record([
                "File",
                "Cached",
                "Repair notes",
                "Closure match",
                "Logged date",
                "Arrival",
                "Timeliness",
                "Warnings",
            ]);

            for record in &records {
                let outcome = &record.outcome;
                builder.push_record([
                    record.file_name.clone(),
                    if record.cache_hit { "yes" } else { "no" }.to_string(),
                    ReportValue::from(outcome.repair_notes_present).to_string(),
                    ReportValue::from(outcome.closure_matches_repair).to_string(),
                    ReportValue::from(outcome.logged_date_present).to_string(),
                    ReportValue::from(outcome.engineer_arrival_present).to_string(),
                    ReportValue::from(outcome.service_provider_timeliness).to_string(),
                    record.warnings.len().to_string(),
                ]);
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            sections.push(table.to_string());

            for record in &records {
                for warning in &record.warnings {
                    sections.push(self.warning(&format!("{}: {}", record.file_name, warning)));
                }
            }

            for record in &records {
                sections.push(String::new());
                sections.push(self.format_record(record));
            }
        }

        for report in reports {
            if let Err(e) = &report.result {
                sections.push(self.error(&format!("{}: {}", report.file_name, e)));
            }
        }

        sections.join("\n")
    }

    /// Format one audited document: its report rows, then the generated summary.
    pub fn format_record(&self, record: &AuditRecord) -> String {
        let summary = if record.summary.is_empty() {
            self.colorize("(no summary generated)", "yellow")
        } else {
            record.summary.clone()
        };
        format!(
            "{}\n{}\n{}",
            self.info(&record.file_name),
            self.format_record_rows(record),
            summary
        )
    }

    /// Format one record's report rows.
    pub fn format_record_rows(&self, record: &AuditRecord) -> String {
        let mut builder = Builder::default();
        builder.push_record([
            fieldaudit_domain::report::PARAMETER_COLUMN,
            fieldaudit_domain::report::RESULT_COLUMN,
        ]);
        for row in record.rows() {
            builder.push_record([row.parameter.to_string(), row.result.to_string()]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Batch results as JSON: the full record for audited documents, the error
/// for failed ones.
pub fn reports_json(reports: &[DocumentReport]) -> Result<serde_json::Value> {
    let mut entries = Vec::with_capacity(reports.len());
    for report in reports {
        let entry = match &report.result {
            Ok(record) => serde_json::json!({
                "status": "ok",
                "record": serde_json::to_value(record)?,
            }),
            Err(e) => serde_json::json!({
                "status": "failed",
                "file_name": report.file_name,
                "error": e.to_string(),
            }),
        };
        entries.push(entry);
    }
    Ok(serde_json::Value::Array(entries))
}

fn format_reports_quiet(reports: &[DocumentReport]) -> String {
    reports
        .iter()
        .map(|r| format!("{}\t{}", r.file_name, if r.is_ok() { "ok" } else { "failed" }))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldaudit_domain::{AuditOutcome, ExtractedFields};
    use fieldaudit_extractor::{ExtractionWarning, GenerationStage, PipelineError};

    fn record() -> AuditRecord {
        let fields = ExtractedFields {
            repair_notes: Some("replaced fan motor".to_string()),
            closure_code: Some("replaced".to_string()),
            ..Default::default()
        };
        AuditRecord {
            file_name: "job-118.pdf".to_string(),
            key: "job118pdf".to_string(),
            cache_hit: false,
            logged_date: None,
            outcome: AuditOutcome::assess(None, &fields),
            fields,
            summary: "Repair Notes: replaced fan motor".to_string(),
            warnings: vec![ExtractionWarning::EmptyReply {
                stage: GenerationStage::Dates,
            }],
        }
    }

    fn reports() -> Vec<DocumentReport> {
        vec![
            DocumentReport {
                file_name: "job-118.pdf".to_string(),
                result: Ok(record()),
            },
            DocumentReport {
                file_name: "???.pdf".to_string(),
                result: Err(PipelineError::EmptyKey("???".to_string())),
            },
        ]
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_reports(&reports()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["status"], "ok");
        assert_eq!(value[0]["record"]["key"], "job118pdf");
        assert_eq!(value[0]["record"]["outcome"]["service_provider_timeliness"], "DataMissing");
        assert_eq!(value[0]["record"]["warnings"][0]["kind"], "empty_reply");
        assert_eq!(value[1]["status"], "failed");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_reports(&reports()).unwrap();
        assert_eq!(output, "job-118.pdf\tok\n???.pdf\tfailed");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_reports(&reports()).unwrap();
        assert!(output.contains("Closure match"));
        assert!(output.contains("job-118.pdf"));
        assert!(output.contains("Data Missing"));
        assert!(output.contains("⚠ job-118.pdf: dates generation returned nothing"));
        assert!(output.contains("✗ ???.pdf"));
    }

    #[test]
    fn test_table_shows_rows_and_summary_per_document() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_reports(&reports()).unwrap();
        assert!(output.contains("ℹ job-118.pdf"));
        assert!(output.contains("Audit Parameter"));
        assert!(output.contains("service provider stimulated Dt"));
        assert!(output.contains("Repair Notes: replaced fan motor"));
    }

    #[test]
    fn test_record_without_summary() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut record = record();
        record.summary.clear();
        let output = formatter.format_record(&record);
        assert!(output.contains("(no summary generated)"));
    }

    #[test]
    fn test_empty_reports() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_reports(&[]).unwrap();
        assert!(output.contains("No documents audited"));
    }

    #[test]
    fn test_record_rows() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_record_rows(&record());
        assert!(output.contains("Audit Parameter"));
        assert!(output.contains("service provider stimulated Dt"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
