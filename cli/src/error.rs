//! Error types for CLI operations

use std::path::PathBuf;
use thiserror::Error;

use bulwark_core::{CatalogError, ConversionError};

/// Errors reading fight input files
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read fight file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fight JSON in {path}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),
}

/// Anything a command can fail with
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("invalid conversion settings")]
    Conversion(#[from] ConversionError),

    #[error("failed to serialize report")]
    Serialize(#[source] serde_json::Error),
}
