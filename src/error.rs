//! Error types for loading game data.
//!
//! Only data loading can fail. Rule-level problems (unknown catalog keys,
//! a full enemy row, unmet action gates) are logged no-ops, never errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::game::CatalogKind;

/// Failure while fetching or parsing one catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    Io {
        /// Which catalog was being fetched.
        kind: CatalogKind,
        /// The file that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The catalog text is not valid catalog JSON.
    Parse {
        /// Which catalog was being parsed.
        kind: CatalogKind,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The source has no data for this catalog kind.
    Missing(CatalogKind),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { kind, path, source } => {
                write!(f, "failed to read {kind} catalog {}: {source}", path.display())
            }
            Self::Parse { kind, source } => write!(f, "invalid {kind} catalog: {source}"),
            Self::Missing(kind) => write!(f, "no data for {kind} catalog"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Missing(_) => None,
        }
    }
}

/// Failure while loading a session configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io {
        /// The file that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The configuration is not valid JSON for a session config.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            Self::Parse(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Missing(CatalogKind::Enemies);
        assert_eq!(err.to_string(), "no data for enemy catalog");
    }

    #[test]
    fn test_parse_error_has_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = CatalogError::Parse {
            kind: CatalogKind::Buildings,
            source: json_err,
        };
        assert!(err.to_string().starts_with("invalid building catalog"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
