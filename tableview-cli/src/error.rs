//! Command-line errors.

use std::path::PathBuf;

use tableview_lib::error::RowError;
use thiserror::Error;

/// Errors that stop the tool.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not a list of rows.
    #[error("invalid rows in {path}: {source}")]
    Rows {
        path: PathBuf,
        #[source]
        source: RowError,
    },

    /// A `--sort` argument names no column.
    #[error("invalid sort '{0}': expected column[:asc|desc]")]
    InvalidSort(String),

    /// The log file could not be created.
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
