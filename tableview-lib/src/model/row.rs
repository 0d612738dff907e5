//! Dynamic table row

use std::collections::HashSet;
use std::fmt;

use super::CellValue;
use crate::error::RowError;

/// Stable identifier of a row.
///
/// Used to attribute match spans to rows independently of where the row
/// currently sits in the ordered view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(String);

impl RowId {
    /// Creates a new row id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for RowId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl From<usize> for RowId {
    fn from(v: usize) -> Self {
        Self(v.to_string())
    }
}

/// One record of the table.
///
/// Fields keep their insertion order. The engine only ever reads rows; every
/// sorted, filtered or paged view is computed over row indices.
///
/// # Example
///
/// ```
/// use tableview_lib::model::{CellValue, Row};
///
/// let row = Row::new("A-100")
///     .set("name", "Laptop")
///     .set("price", 1200);
///
/// assert_eq!(row.get("price"), Some(&CellValue::Number(1200.0)));
/// assert_eq!(row.keys().collect::<Vec<_>>(), vec!["name", "price"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    fields: Vec<(String, CellValue)>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    /// Sets a field, replacing an existing value in place (builder style).
    pub fn set(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Returns the row id.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Field keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // JSON input
    // =========================================================================

    /// Builds a row from a JSON object.
    ///
    /// The id is taken from `id_field` when that field is present and not
    /// empty; otherwise the positional `index` is used.
    pub fn from_json(
        index: usize,
        value: serde_json::Value,
        id_field: Option<&str>,
    ) -> Result<Self, RowError> {
        let serde_json::Value::Object(map) = value else {
            return Err(RowError::not_an_object(index, &value));
        };

        let id = id_field
            .and_then(|field| map.get(field))
            .map(|v| CellValue::from(v.clone()).display_text())
            .filter(|id| !id.is_empty())
            .map(RowId::from)
            .unwrap_or_else(|| RowId::from(index));

        let mut row = Row::new(id);
        for (key, value) in map {
            row.insert(key, CellValue::from(value));
        }
        Ok(row)
    }

    /// Builds rows from a JSON array of objects.
    ///
    /// Ids are unique across the list: a repeated `id_field` value gets the
    /// row's position appended (`"A#3"`).
    pub fn list_from_json(
        value: serde_json::Value,
        id_field: Option<&str>,
    ) -> Result<Vec<Self>, RowError> {
        let serde_json::Value::Array(items) = value else {
            return Err(RowError::not_an_array(&value));
        };
        let mut seen = HashSet::with_capacity(items.len());
        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let mut row = Row::from_json(index, item, id_field)?;
            if !seen.insert(row.id.clone()) {
                let mut id = RowId::from(format!("{}#{index}", row.id));
                while !seen.insert(id.clone()) {
                    id = RowId::from(format!("{id}#"));
                }
                log::warn!("duplicate row id '{}' at {index}; using '{id}'", row.id);
                row.id = id;
            }
            rows.push(row);
        }
        Ok(rows)
    }

    /// Parses and builds rows from a JSON document.
    pub fn list_from_json_str(json: &str, id_field: Option<&str>) -> Result<Vec<Self>, RowError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::list_from_json(value, id_field)
    }
}
