//! Replay command implementation.

use super::output::{JsonReplay, format_text};
use super::{CliError, OutputFormat, load_config};
use gbot::Agent;
use gbot::replay::{self, Recording};
use std::path::Path;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the config or the recording cannot be loaded.
pub(crate) fn execute(
    recording_path: &Path,
    config_path: Option<&Path>,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let recording = Recording::load(recording_path).map_err(|e| {
        CliError::new(format!("Failed to load recording {}: {e}", recording_path.display()))
    })?;

    let mut agent = match seed {
        Some(seed) => Agent::new(config, seed),
        None => Agent::from_entropy(config),
    };
    let records = replay::run(&mut agent, &recording);

    match format {
        OutputFormat::Text => print!("{}", format_text(&records)),
        OutputFormat::Json => {
            let output = JsonReplay::new(seed, &records);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
