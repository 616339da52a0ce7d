//! CLI command implementations for gbot.

pub(crate) mod config;
pub(crate) mod replay;

mod output;

use clap::ValueEnum;
use gbot::AgentConfig;
use gbot::config::ConfigError;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One human-readable line per turn.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the config at `path`, or the built-in one.
fn load_config(path: Option<&Path>) -> Result<AgentConfig, CliError> {
    Ok(match path {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    })
}
