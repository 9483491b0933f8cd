//! Error types for the `cis-config` crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid YAML for its expected shape.
    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A pattern declares an empty keyword, which would match every input.
    #[error("Pattern '{pattern}' declares an empty keyword")]
    EmptyKeyword { pattern: String },
}

/// A convenience result type for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
