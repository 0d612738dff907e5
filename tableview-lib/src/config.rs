//! View configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// Per-table configuration for sorting, searching and pagination.
///
/// The engine never persists this; callers that want to remember a user's
/// preferences can serialize it themselves.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tableview_lib::ViewConfig;
///
/// let config = ViewConfig::default()
///     .with_page_size(25)
///     .with_debounce(Duration::from_millis(150))
///     .with_min_query_length(2);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Delay between the last keystroke and the filter pass.
    ///
    /// Default: 300 ms
    #[serde(with = "duration_ms")]
    pub debounce: Duration,

    /// Queries shorter than this (in characters) leave the rows unfiltered.
    ///
    /// Default: 1
    pub min_query_length: usize,

    /// Whether searching distinguishes letter case.
    ///
    /// Default: false
    pub case_sensitive: bool,

    /// Maximum number of page-number buttons in the page strip.
    ///
    /// Default: 5
    pub page_buttons: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            debounce: Duration::from_millis(300),
            min_query_length: 1,
            case_sensitive: false,
            page_buttons: 5,
        }
    }
}

impl ViewConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a config from a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the keystroke debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Sets the minimum query length.
    pub fn with_min_query_length(mut self, min_query_length: usize) -> Self {
        self.min_query_length = min_query_length;
        self
    }

    /// Enables or disables case-sensitive search.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Sets the maximum number of page-number buttons.
    pub fn with_page_buttons(mut self, page_buttons: usize) -> Self {
        self.page_buttons = page_buttons;
        self
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        if self.page_buttons == 0 {
            return Err(ConfigError::InvalidPageButtons(self.page_buttons));
        }
        Ok(())
    }

    /// Returns a copy with unusable settings clamped to their minimum.
    pub(crate) fn sanitized(&self) -> Self {
        if let Err(e) = self.validate() {
            log::warn!("{e}; clamping to a usable value");
        }
        Self {
            page_size: self.page_size.max(1),
            page_buttons: self.page_buttons.max(1),
            ..self.clone()
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
