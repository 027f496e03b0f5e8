//! Audit command implementation.

use crate::backend::{FileTextReader, Generator, Store};
use crate::cli::AuditArgs;
use crate::config::{Config, OutputFormat};
use crate::csv_report::CsvReports;
use crate::error::{CliError, Result};
use crate::output::{reports_json, Formatter};
use chrono::Local;
use fieldaudit_domain::datetime::{self, ParsedTimestamp};
use fieldaudit_domain::traits::{DocumentReader, TextGenerator, TextStore};
use fieldaudit_domain::Timestamp;
use fieldaudit_extractor::{AuditPipeline, DocumentInput, DocumentReport, FieldExtractor};
use fieldaudit_store::ExtractionCache;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// How long shutdown waits for generations abandoned after their timeout
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Execute the audit command.
///
/// Every file is audited even when earlier ones fail; the command reports
/// failure afterwards if any document could not be audited or reported.
pub fn execute_audit(args: AuditArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let logged_date = resolve_logged_date(args.logged_date.as_deref());
    let inputs = read_inputs(&args.files)?;
    let total = inputs.len();

    // The HTTP providers must be created and dropped outside the runtime
    let generator = Generator::from_config(config)?;
    let pipeline = AuditPipeline::new(
        FieldExtractor::new(generator, config.extractor.clone()),
        ExtractionCache::new(Store::open(config)?),
        FileTextReader,
    );

    let reports = run_batch(&pipeline, inputs, logged_date, SHUTDOWN_GRACE)?;

    let out_dir = args.out_dir.unwrap_or_else(|| config.output.dir.clone());
    let mut csv_reports = CsvReports::new(out_dir);
    let mut unreported = 0;
    for report in &reports {
        let Ok(record) = &report.result else { continue };
        match csv_reports.write(record) {
            Ok(path) => {
                if formatter.format() == OutputFormat::Table {
                    println!("{}", formatter.success(&format!("Wrote {}", path.display())));
                }
            }
            Err(e) => {
                error!("Could not write the report for '{}': {}", record.file_name, e);
                eprintln!("{}", formatter.error(&format!("{}: report not written: {}", record.file_name, e)));
                unreported += 1;
            }
        }
    }

    let json_result = match &args.json {
        Some(json_path) => reports_json(&reports)
            .and_then(|value| write_json(json_path, &value))
            .map(|()| info!("Wrote JSON records to {}", json_path.display())),
        None => Ok(()),
    };

    println!("{}", formatter.format_reports(&reports)?);

    let failed = reports.iter().filter(|r| !r.is_ok()).count() + unreported;
    if failed > 0 {
        if let Err(e) = &json_result {
            error!("Could not write JSON records: {}", e);
        }
        return Err(CliError::BatchFailed { failed, total });
    }
    json_result
}

/// Audit `inputs` on a dedicated runtime.
///
/// Generations abandoned after their timeout keep running on the blocking
/// pool. Shutdown waits at most `grace` for them.
fn run_batch<G, S, R>(
    pipeline: &AuditPipeline<G, S, R>,
    inputs: Vec<DocumentInput>,
    logged_date: Timestamp,
    grace: Duration,
) -> Result<Vec<DocumentReport>>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
    S: TextStore + Send + Sync + 'static,
    S::Error: Display,
    R: DocumentReader + Send + Sync + 'static,
    R::Error: Display,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let reports = runtime.block_on(pipeline.audit_batch(inputs, Some(logged_date)));
    runtime.shutdown_timeout(grace);
    Ok(reports)
}

/// The logged date to audit against.
///
/// Defaults to now. A value that parses in no known layout is replaced by the
/// current time, with a warning.
pub fn resolve_logged_date(text: Option<&str>) -> Timestamp {
    let Some(text) = text else {
        return Local::now().naive_local();
    };

    match datetime::parse(text) {
        ParsedTimestamp::Parsed { value, format } => {
            info!("Logged date '{}' read as {} ({})", text, value, format);
            value
        }
        ParsedTimestamp::Fallback(now) => {
            warn!("Could not parse logged date '{}', using the current time", text);
            now
        }
    }
}

fn read_inputs(files: &[PathBuf]) -> Result<Vec<DocumentInput>> {
    files
        .iter()
        .map(|path| {
            let bytes = fs::read(path)
                .map_err(|e| CliError::InvalidInput(format!("Cannot read {}: {}", path.display(), e)))?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(DocumentInput::new(file_name, bytes))
        })
        .collect()
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
