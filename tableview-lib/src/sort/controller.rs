//! Sort controller - owns the active sort keys of one table.

use super::compare::RowComparator;
use super::key::{SortDirection, SortKey};
use crate::model::{ColumnSet, Row};

/// Owns the active sort-key list of a table.
///
/// List order is priority order (index 0 is the primary key) and each
/// column appears at most once. Every mutation renumbers `priority`.
#[derive(Debug, Clone, Default)]
pub struct SortController {
    keys: Vec<SortKey>,
}

impl SortController {
    /// Create a controller with no active keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller from keys in priority order.
    ///
    /// Later keys for an already-listed column are dropped.
    pub fn with_keys(keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut controller = Self::new();
        for key in keys {
            if controller.priority_of(&key.column).is_none() {
                controller.keys.push(key);
            }
        }
        controller.renumber();
        controller
    }

    /// Active keys in priority order.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Returns `true` if no column is sorted.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Direction of a column's key, if it is sorted.
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }

    /// Priority of a column's key, if it is sorted.
    pub fn priority_of(&self, column: &str) -> Option<usize> {
        self.keys.iter().position(|k| k.column == column)
    }

    /// Handle a header interaction on a column.
    ///
    /// Single-key: clicking the sole active column flips it; any other
    /// click makes the column the only key, ascending.
    ///
    /// Multi-key: an active column flips and moves to the front; an inactive
    /// one is inserted at the front ascending, shifting the others down.
    pub fn toggle(&mut self, column: &str, multi_key: bool) {
        if multi_key {
            let direction = match self.priority_of(column) {
                Some(index) => self.keys.remove(index).direction.toggled(),
                None => SortDirection::Ascending,
            };
            self.keys.insert(0, SortKey::new(column, direction));
        } else {
            let sole = matches!(self.keys.as_slice(), [only] if only.column == column);
            if sole {
                self.keys[0].direction = self.keys[0].direction.toggled();
            } else {
                self.keys = vec![SortKey::asc(column)];
            }
        }
        self.renumber();
        log::debug!("sort keys after toggling '{column}': {}", self.describe());
    }

    /// Make a column the only key.
    pub fn set(&mut self, column: &str, direction: SortDirection) {
        self.keys = vec![SortKey::new(column, direction)];
        self.renumber();
    }

    /// Append a key at the lowest priority, replacing the column's
    /// existing key.
    pub fn add(&mut self, column: &str, direction: SortDirection) {
        if let Some(index) = self.priority_of(column) {
            self.keys.remove(index);
        }
        self.keys.push(SortKey::new(column, direction));
        self.renumber();
    }

    /// Remove a column's key. Returns `false` if it was not sorted.
    pub fn remove(&mut self, column: &str) -> bool {
        match self.priority_of(column) {
            Some(index) => {
                self.keys.remove(index);
                self.renumber();
                true
            }
            None => false,
        }
    }

    /// Clear all keys.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Stable-sort row indices by the active keys.
    ///
    /// With no keys the indices keep their order.
    pub fn apply(&self, rows: &[Row], columns: &ColumnSet, indices: &mut [usize]) {
        if self.keys.is_empty() {
            return;
        }
        RowComparator::new(columns, &self.keys).sort_indices(rows, indices);
        log::debug!("sorted {} rows by {}", indices.len(), self.describe());
    }

    /// Sorted indices of every row.
    pub fn sorted(&self, rows: &[Row], columns: &ColumnSet) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        self.apply(rows, columns, &mut indices);
        indices
    }

    fn renumber(&mut self) {
        for (priority, key) in self.keys.iter_mut().enumerate() {
            key.priority = priority;
        }
    }

    fn describe(&self) -> String {
        self.keys
            .iter()
            .map(|k| format!("{} {}", k.column, k.direction.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
