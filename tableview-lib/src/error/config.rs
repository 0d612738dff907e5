//! ConfigError for view configuration

/// Error type for loading or validating a [`ViewConfig`](crate::ViewConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Page size must be at least one row.
    #[error("Invalid page size {0}: must be at least 1")]
    InvalidPageSize(usize),

    /// The page-number strip needs room for at least one button.
    #[error("Invalid page button count {0}: must be at least 1")]
    InvalidPageButtons(usize),

    /// The config document could not be parsed.
    #[error("Failed to parse view config: {0}")]
    Parse(#[from] serde_json::Error),
}
