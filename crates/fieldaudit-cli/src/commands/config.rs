//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show(config, path, formatter),
        ConfigAction::Init { force } => init(path, force, formatter),
    }
}

/// Print the effective configuration.
fn show(config: &Config, path: &Path, formatter: &Formatter) -> Result<()> {
    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Quiet => print!("{}", config.to_toml()?),
        OutputFormat::Table => {
            let source = if path.exists() { "" } else { " (not found, showing defaults)" };
            println!("{}", formatter.info(&format!("{}{}", path.display(), source)));
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

/// Write the default configuration to `path`.
fn init(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }

    Config::default().save(path)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote default configuration to {}", path.display()))
    );
    Ok(())
}
