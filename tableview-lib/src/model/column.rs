//! Column descriptors

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::{CellValue, Row};
use crate::sort::CellType;

/// Reads one cell out of a row.
pub type Accessor = Arc<dyn Fn(&Row) -> Option<CellValue> + Send + Sync>;

/// Orders two cell values of one column.
pub type Comparator = Arc<dyn Fn(&CellValue, &CellValue) -> Ordering + Send + Sync>;

static NULL_CELL: CellValue = CellValue::Null;

/// Caller-supplied metadata describing how to read, search and compare one
/// field across rows.
///
/// # Examples
///
/// ```
/// use tableview_lib::model::ColumnDescriptor;
/// use tableview_lib::sort::CellType;
///
/// let columns = vec![
///     ColumnDescriptor::new("asset_no").label("Asset #"),
///     ColumnDescriptor::new("price").sort_type(CellType::Number),
///     ColumnDescriptor::new("memo").searchable(false),
/// ];
/// ```
#[derive(Clone)]
pub struct ColumnDescriptor {
    /// Key the column is addressed by (sort keys, search scope, spans).
    pub key: String,
    /// Header text.
    pub label: String,
    /// Whether the column takes part in "search all columns".
    pub searchable: bool,
    /// Explicit type used for every row instead of per-value inference.
    pub sort_type: Option<CellType>,
    /// Custom comparator; takes precedence over `sort_type`.
    pub comparator: Option<Comparator>,
    /// Custom accessor; falls back to the same-named field on `None`.
    pub accessor: Option<Accessor>,
}

impl ColumnDescriptor {
    /// Create a searchable column read from the same-named field.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            searchable: true,
            sort_type: None,
            comparator: None,
            accessor: None,
        }
    }

    /// Set the header text.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Include or exclude the column from searching.
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Pin the column's sort type.
    pub fn sort_type(mut self, sort_type: CellType) -> Self {
        self.sort_type = Some(sort_type);
        self
    }

    /// Use a custom comparator for this column.
    ///
    /// The comparator must describe a total order.
    pub fn comparator(
        mut self,
        comparator: impl Fn(&CellValue, &CellValue) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Read the cell through a custom accessor.
    pub fn accessor(
        mut self,
        accessor: impl Fn(&Row) -> Option<CellValue> + Send + Sync + 'static,
    ) -> Self {
        self.accessor = Some(Arc::new(accessor));
        self
    }

    /// Resolve this column's cell on a row.
    ///
    /// Missing cells resolve to [`CellValue::Null`].
    pub fn resolve<'a>(&self, row: &'a Row) -> Cow<'a, CellValue> {
        if let Some(value) = self.accessor.as_ref().and_then(|accessor| accessor(row)) {
            return Cow::Owned(value);
        }
        Cow::Borrowed(row.get(&self.key).unwrap_or(&NULL_CELL))
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("searchable", &self.searchable)
            .field("sort_type", &self.sort_type)
            .field("comparator", &self.comparator.is_some())
            .field("accessor", &self.accessor.is_some())
            .finish()
    }
}

/// The ordered column descriptors of one table.
///
/// An empty set is valid: every cell is then read by field name and typed
/// by inference.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSet {
    /// Creates an empty column set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, replacing an existing one with the same key.
    pub fn push(&mut self, column: ColumnDescriptor) {
        match self.columns.iter_mut().find(|c| c.key == column.key) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Returns the descriptor for a key.
    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Descriptors in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no descriptors were supplied.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolve a cell by column key.
    ///
    /// Uses the column's accessor when one is described, the same-named
    /// field otherwise.
    pub fn resolve<'a>(&self, row: &'a Row, key: &str) -> Cow<'a, CellValue> {
        match self.get(key) {
            Some(column) => column.resolve(row),
            None => Cow::Borrowed(row.get(key).unwrap_or(&NULL_CELL)),
        }
    }

    /// Keys searched when the scope is "all columns".
    ///
    /// Every searchable descriptor, or every field of the row when no
    /// descriptors exist.
    pub fn searchable_keys<'a>(&'a self, row: &'a Row) -> Vec<&'a str> {
        if self.columns.is_empty() {
            row.keys().collect()
        } else {
            self.columns
                .iter()
                .filter(|c| c.searchable)
                .map(|c| c.key.as_str())
                .collect()
        }
    }
}

impl FromIterator<ColumnDescriptor> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = ColumnDescriptor>>(iter: I) -> Self {
        let mut set = ColumnSet::new();
        for column in iter {
            set.push(column);
        }
        set
    }
}

impl From<Vec<ColumnDescriptor>> for ColumnSet {
    fn from(columns: Vec<ColumnDescriptor>) -> Self {
        columns.into_iter().collect()
    }
}
