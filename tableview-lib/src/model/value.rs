//! CellValue enum for raw cell contents

use std::fmt;

/// A raw cell value as supplied by the caller.
///
/// The engine never interprets a value beyond what sorting and searching
/// need; its semantic type is inferred on demand (see
/// [`infer`](crate::sort::infer)).
///
/// # Example
///
/// ```
/// use tableview_lib::model::CellValue;
///
/// let price = CellValue::from(100);
/// let name = CellValue::from("Laptop");
/// let active = CellValue::from(true);
///
/// assert_eq!(price.to_string(), "100");
/// assert_eq!(name.to_string(), "Laptop");
/// assert_eq!(active.to_string(), "true");
/// assert_eq!(CellValue::Null.to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
}

impl CellValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns `true` for null values and text that is empty after trimming.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the text slice for text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Bool(_) => "bool",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
        }
    }

    /// The text a view would render for this cell.
    ///
    /// Match offsets reported by the search engine refer to this string.
    pub fn display_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<f32> for CellValue {
    fn from(v: f32) -> Self {
        CellValue::Number(f64::from(v))
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Number(f64::from(v))
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::Number(f64::from(v))
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<u64> for CellValue {
    fn from(v: u64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<usize> for CellValue {
    fn from(v: usize) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => CellValue::Number(f),
                None => CellValue::Text(n.to_string()),
            },
            serde_json::Value::String(s) => CellValue::Text(s),
            other => CellValue::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text() {
        assert_eq!(CellValue::from(100).display_text(), "100");
        assert_eq!(CellValue::from(-12.5).display_text(), "-12.5");
        assert_eq!(CellValue::from(false).display_text(), "false");
        assert_eq!(CellValue::Null.display_text(), "");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(CellValue::from(None::<i32>), CellValue::Null);
        assert_eq!(CellValue::from(Some("x")), CellValue::Text("x".into()));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(CellValue::from(serde_json::json!(3)), CellValue::Number(3.0));
        assert_eq!(CellValue::from(serde_json::json!(null)), CellValue::Null);
        assert_eq!(
            CellValue::from(serde_json::json!(["a", 1])),
            CellValue::Text(r#"["a",1]"#.into())
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(CellValue::Null.is_empty());
        assert!(CellValue::from("   ").is_empty());
        assert!(!CellValue::from(0).is_empty());
    }
}
