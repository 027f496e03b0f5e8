//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fieldaudit CLI - Audit field-service completion reports.
#[derive(Debug, Parser)]
#[command(name = "fieldaudit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FIELDAUDIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (file names and status only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Audit one or more completion reports
    Audit(AuditArgs),

    /// Inspect the extraction cache
    Cache(CacheArgs),

    /// Show the cache key a file name maps to
    Normalize {
        /// File name to normalize
        name: String,
    },

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the audit command.
#[derive(Debug, Parser)]
pub struct AuditArgs {
    /// Report files (PDF or plain text)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory for the per-document CSV reports
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Date the call was logged (e.g. "07-Oct-2024, 09:00 AM"); defaults to now
    #[arg(short, long)]
    pub logged_date: Option<String>,

    /// Also write every audit record to this JSON file
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Arguments for the cache command.
#[derive(Debug, Parser)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache actions.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Print the cached text for a file name
    Lookup {
        /// File name as it was audited
        name: String,
    },
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_command() {
        let cli = Cli::parse_from([
            "fieldaudit",
            "audit",
            "a.pdf",
            "b.pdf",
            "--out-dir",
            "reports",
            "--logged-date",
            "07-Oct-2024, 09:00 AM",
        ]);
        match cli.command {
            Command::Audit(args) => {
                assert_eq!(args.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
                assert_eq!(args.out_dir, Some(PathBuf::from("reports")));
                assert_eq!(args.logged_date.as_deref(), Some("07-Oct-2024, 09:00 AM"));
                assert!(args.json.is_none());
            }
            _ => panic!("Expected Audit command"),
        }
    }

    #[test]
    fn test_audit_requires_files() {
        assert!(Cli::try_parse_from(["fieldaudit", "audit"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["fieldaudit", "normalize", "Job 1.pdf", "-vv", "--format", "json", "--no-color"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert!(cli.no_color);
        assert!(matches!(cli.command, Command::Normalize { name } if name == "Job 1.pdf"));
    }

    #[test]
    fn test_config_init_command() {
        let cli = Cli::parse_from(["fieldaudit", "config", "init", "--force"]);
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { force },
            }) => assert!(force),
            _ => panic!("Expected Config Init command"),
        }
    }
}
