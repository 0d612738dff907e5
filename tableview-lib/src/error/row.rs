//! RowError for decoding rows from JSON

/// Error type for building [`Row`](crate::model::Row) values from JSON input.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// A row entry was not a JSON object.
    #[error("Row {index} is not a JSON object (got {actual})")]
    NotAnObject { index: usize, actual: &'static str },

    /// The document root was not a JSON array of rows.
    #[error("Expected a JSON array of rows, got {actual}")]
    NotAnArray { actual: &'static str },

    /// The document could not be parsed at all.
    #[error("Failed to parse rows: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RowError {
    /// Creates a new not-an-object error.
    pub fn not_an_object(index: usize, value: &serde_json::Value) -> Self {
        Self::NotAnObject {
            index,
            actual: json_kind(value),
        }
    }

    /// Creates a new not-an-array error.
    pub fn not_an_array(value: &serde_json::Value) -> Self {
        Self::NotAnArray {
            actual: json_kind(value),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
