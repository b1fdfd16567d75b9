//! CLI command implementations for Daybreak.

pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod simulate;
pub(crate) mod validate;

mod output;

use clap::ValueEnum;
use daybreak::game::{Catalog, DirSource};
use daybreak::SessionConfig;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Every event, then the final status.
    Events,
    /// Final status only.
    Status,
}

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
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

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<daybreak::CatalogError> for CliError {
    fn from(e: daybreak::CatalogError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<daybreak::ConfigError> for CliError {
    fn from(e: daybreak::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<daybreak::sim::SimError> for CliError {
    fn from(e: daybreak::sim::SimError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<daybreak::replay::RecordingError> for CliError {
    fn from(e: daybreak::replay::RecordingError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load catalogs from a data directory, or the built-in data.
fn load_catalog(data: Option<&Path>) -> Result<Catalog, CliError> {
    let catalog = match data {
        Some(dir) => Catalog::from_source(&DirSource::new(dir))?,
        None => Catalog::embedded()?,
    };
    Ok(catalog)
}

/// Load a session configuration file, or the defaults.
fn load_config(path: Option<&Path>) -> Result<SessionConfig, CliError> {
    Ok(path.map(SessionConfig::load).transpose()?.unwrap_or_default())
}

/// Use the given seed or derive one from the clock.
fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
            .unwrap_or(42)
    })
}
