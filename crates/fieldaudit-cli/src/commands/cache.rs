//! Cache command implementation.

use crate::backend::Store;
use crate::cli::{CacheAction, CacheArgs};
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fieldaudit_domain::normalize;
use fieldaudit_store::ExtractionCache;

/// Execute the cache command.
pub fn execute_cache(args: CacheArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    match args.action {
        CacheAction::Lookup { name } => lookup(&name, config, formatter),
    }
}

/// Print the cached text stored for a file name.
fn lookup(name: &str, config: &Config, formatter: &Formatter) -> Result<()> {
    let key = normalize(name);
    if key.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "'{}' has no letters or digits to look up",
            name
        )));
    }

    let cache = ExtractionCache::new(Store::open(config)?);
    let text = cache.lookup(&key)?;

    match formatter.format() {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "name": name,
                "key": key,
                "text": text,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Quiet => {
            if let Some(text) = text {
                println!("{}", text);
            }
        }
        OutputFormat::Table => match text {
            Some(text) => {
                println!("{}", formatter.info(&format!("Cached text for key '{}':", key)));
                println!("{}", text);
            }
            None => println!("{}", formatter.warning(&format!("Nothing cached under key '{}'", key))),
        },
    }

    Ok(())
}
