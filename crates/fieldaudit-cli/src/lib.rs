//! Fieldaudit CLI library.
//!
//! This library provides the core functionality for the `fieldaudit` command-line
//! interface, including configuration management, provider and cache backend
//! selection, command execution, and output formatting.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod csv_report;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
