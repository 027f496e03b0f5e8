//! Fieldaudit CLI - Audit field-service completion reports from the command line.

use clap::Parser;
use fieldaudit_cli::commands;
use fieldaudit_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `-v` overrides `RUST_LOG`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> fieldaudit_cli::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    // A broken file should not stop `config init --force` from replacing it
    let config = match (&cli.command, Config::load(&config_path)) {
        (_, Ok(config)) => config,
        (Command::Config(_), Err(e)) => {
            tracing::warn!("Ignoring unreadable configuration: {}", e);
            Config::default()
        }
        (_, Err(e)) => return Err(e),
    };

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.output.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.output.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Audit(args) => commands::execute_audit(args, &config, &formatter),
        Command::Cache(args) => commands::execute_cache(args, &config, &formatter),
        Command::Normalize { name } => commands::execute_normalize(&name, &formatter),
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter),
    }
}
