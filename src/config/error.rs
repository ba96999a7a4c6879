//! Errors raised while loading `sentinel.toml`

use std::path::PathBuf;
use thiserror::Error;

/// Why a console configuration could not be used
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file is missing; the default path is optional
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A value the backend or the refresh timer cannot work with
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}
