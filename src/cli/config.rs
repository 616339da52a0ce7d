//! Config command implementation.

use super::{CliError, load_config};
use std::path::Path;

/// Execute the config command.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded.
pub(crate) fn execute(path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
