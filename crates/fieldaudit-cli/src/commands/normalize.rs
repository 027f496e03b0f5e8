//! Normalize command implementation.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use fieldaudit_domain::normalize;

/// Execute the normalize command.
pub fn execute_normalize(name: &str, formatter: &Formatter) -> Result<()> {
    let key = normalize(name);

    match formatter.format() {
        OutputFormat::Json => {
            let value = serde_json::json!({ "name": name, "key": key });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Quiet => println!("{}", key),
        OutputFormat::Table if key.is_empty() => {
            println!("{}", formatter.warning(&format!("'{}' normalizes to an empty key", name)));
        }
        OutputFormat::Table => println!("{} → {}", name, key),
    }

    Ok(())
}
