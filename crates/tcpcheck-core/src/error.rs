//! Error types for config loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reasons a target config could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no targets found in config")]
    Empty,
}
