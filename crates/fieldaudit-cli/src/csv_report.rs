//! Per-document CSV report files.

use crate::error::Result;
use fieldaudit_domain::report::{PARAMETER_COLUMN, RESULT_COLUMN};
use fieldaudit_extractor::AuditRecord;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SUFFIX: &str = "_audit_summary.csv";

/// Report file name for an audited document
pub fn csv_file_name(file_name: &str) -> String {
    format!("{}{}", base_name(file_name), SUFFIX)
}

/// CSV reports for one batch, written to `<out_dir>/<file>_audit_summary.csv`.
///
/// Documents sharing a base name get numbered report files instead of
/// overwriting each other: `x.pdf_audit_summary.csv`, then
/// `x.pdf_2_audit_summary.csv`.
pub struct CsvReports {
    out_dir: PathBuf,
    taken: HashSet<String>,
}

impl CsvReports {
    /// Reports written under `out_dir`
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            taken: HashSet::new(),
        }
    }

    /// Write the next record's report.
    ///
    /// A failed write still reserves its file name.
    pub fn write(&mut self, record: &AuditRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let name = self.claim_name(&record.file_name);
        let path = self.out_dir.join(name);
        write_rows(record, &path)?;
        Ok(path)
    }

    fn claim_name(&mut self, file_name: &str) -> String {
        let name = csv_file_name(file_name);
        if self.taken.insert(name.clone()) {
            return name;
        }

        let base = base_name(file_name);
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}{}", base, n, SUFFIX);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn base_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

fn write_rows(record: &AuditRecord, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([PARAMETER_COLUMN, RESULT_COLUMN])?;
    for row in record.rows() {
        writer.write_record([row.parameter.to_string(), row.result.to_string()])?;
    }
    writer.flush()?;

    debug!("Wrote {}", path.display());
    Ok(())
}
